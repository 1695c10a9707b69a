use super::error::GeocodeError;
use super::service::{Geocoder, Place};
use crate::sdk::geo::Coord;
use crate::sdk::util::rate_limit::Limiter;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Client for a Nominatim-compatible `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    limiter: Limiter,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>, limiter: Limiter) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter,
        }
    }
}

impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        log::debug!("Waiting for geocode limiter before searching \"{}\"", query);
        self.limiter.until_ready().await;

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            log::error!(
                "Geocoder returned non-success status: {}. Body: {}",
                status,
                text
            );
            return Err(GeocodeError::RawApiError {
                status: status.as_u16(),
                body: text,
            });
        }
        parse_search_results(&text)
    }
}

fn parse_search_results(text: &str) -> Result<Vec<Place>, GeocodeError> {
    let results: Vec<SearchResult> = serde_json::from_str(text)?;
    results
        .into_iter()
        .map(|r| {
            let lat = r
                .lat
                .trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::InvalidCoordinate(r.lat.clone()))?;
            let lon = r
                .lon
                .trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::InvalidCoordinate(r.lon.clone()))?;
            Ok(Place {
                coord: Coord::new(lat, lon),
                display_name: r.display_name,
            })
        })
        .collect()
}

/// Resolves `query` to its best match.
pub async fn locate<G: Geocoder>(geocoder: &G, query: &str) -> Result<Place, GeocodeError> {
    let query = query.trim();
    geocoder
        .search(query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(query.to_string()))
}
