use super::geo::Coord;
use csv::ReaderBuilder;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{fs, path::Path};
use thiserror::Error;

const NAME_KEYS: [&str; 2] = ["nama_objek", "name"];
const DESCRIPTION_KEYS: [&str; 2] = ["deskripsi", "description"];

#[derive(Error, Debug)]
pub enum PoiError {
    #[error("Failed to read POI data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to download POI data: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Feature #{index} is invalid: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

/// A named, located tourism entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Poi {
    pub coord: Coord,
    pub name: String,
    pub description: String,
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<f64>,
}

#[derive(Deserialize)]
struct CsvRecord {
    lat: f64,
    lon: f64,
    name: String,
    #[serde(default)]
    description: String,
}

/// Loads the POI collection from a file path or an `http(s)://` URL.
pub async fn load_pois(source: &str, client: &Client) -> Result<Vec<Poi>, PoiError> {
    let is_remote = source.starts_with("http://") || source.starts_with("https://");
    let is_csv = source.to_ascii_lowercase().ends_with(".csv");

    let text = if is_remote {
        log::debug!("Fetching POI data from {}", source);
        client
            .get(source)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?
    } else {
        fs::read_to_string(Path::new(source))?
    };

    let pois = if is_csv {
        parse_csv(&text)?
    } else {
        parse_geojson(&text)?
    };
    log::info!("Loaded {} POIs from {}", pois.len(), source);
    Ok(pois)
}

pub fn parse_geojson(text: &str) -> Result<Vec<Poi>, PoiError> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| feature_to_poi(index, feature))
        .collect()
}

fn feature_to_poi(index: usize, feature: Feature) -> Result<Poi, PoiError> {
    let invalid = |reason: &str| PoiError::InvalidFeature {
        index,
        reason: reason.to_string(),
    };

    let geometry = feature.geometry.ok_or_else(|| invalid("missing geometry"))?;
    if geometry.kind != "Point" {
        return Err(invalid(&format!("unsupported geometry {}", geometry.kind)));
    }
    // GeoJSON positions are [lon, lat]
    let (lon, lat) = match geometry.coordinates.as_slice() {
        [lon, lat, ..] => (*lon, *lat),
        _ => return Err(invalid("point needs two coordinates")),
    };

    let properties = feature.properties.unwrap_or_default();
    let name = first_string(&properties, &NAME_KEYS).ok_or_else(|| invalid("missing name"))?;
    let description = first_string(&properties, &DESCRIPTION_KEYS).unwrap_or_default();

    Ok(Poi {
        coord: Coord::new(lat, lon),
        name,
        description,
    })
}

fn first_string(properties: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| properties.get(*key))
        .find_map(|value| match value {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
}

/// Parses a CSV with the header `lat,lon,name,description`.
pub fn parse_csv(text: &str) -> Result<Vec<Poi>, PoiError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut pois = Vec::new();
    for result in rdr.deserialize() {
        let record: CsvRecord = result?;
        pois.push(Poi {
            coord: Coord::new(record.lat, record.lon),
            name: record.name,
            description: record.description,
        });
    }
    Ok(pois)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [110.4914, -7.7520] },
                "properties": { "nama_objek": "Candi Prambanan", "deskripsi": "Kompleks candi Hindu" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [110.3644, -7.8053, 114.0] },
                "properties": { "name": "Kraton", "description": null }
            }
        ]
    }"#;

    #[test]
    fn parse_features_swaps_lon_lat() {
        let pois = parse_geojson(SAMPLE).unwrap();
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].name, "Candi Prambanan");
        assert_eq!(pois[0].description, "Kompleks candi Hindu");
        assert_eq!(pois[0].coord, Coord::new(-7.7520, 110.4914));
        assert_eq!(pois[1].name, "Kraton");
        assert_eq!(pois[1].description, "");
        assert_eq!(pois[1].coord, Coord::new(-7.8053, 110.3644));
    }

    #[test]
    fn reject_feature_without_name() {
        let json = r#"{"features":[{"geometry":{"type":"Point","coordinates":[110.0,-7.0]},"properties":{}}]}"#;
        match parse_geojson(json) {
            Err(PoiError::InvalidFeature { index, .. }) => assert_eq!(index, 0),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn reject_non_point_geometry() {
        let json = r#"{"features":[{"geometry":{"type":"LineString","coordinates":[]},"properties":{"name":"x"}}]}"#;
        assert!(matches!(
            parse_geojson(json),
            Err(PoiError::InvalidFeature { .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_geojson("not json"), Err(PoiError::Json(_))));
    }

    #[test]
    fn parse_csv_records() {
        let text = "lat,lon,name,description\n-7.7520, 110.4914, Candi Prambanan, Candi Hindu\n-8.0252,110.3290,Parangtritis,\n";
        let pois = parse_csv(text).unwrap();
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].coord, Coord::new(-7.7520, 110.4914));
        assert_eq!(pois[0].description, "Candi Hindu");
        assert_eq!(pois[1].name, "Parangtritis");
        assert_eq!(pois[1].description, "");
    }

    #[tokio::test]
    async fn load_from_missing_file_fails() {
        let client = Client::new();
        let res = load_pois("/definitely/not/here.geojson", &client).await;
        assert!(matches!(res, Err(PoiError::Io(_))));
    }
}
