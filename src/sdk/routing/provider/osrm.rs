use super::types::{Route, RouteResponse};
use crate::sdk::geo::Coord;
use crate::sdk::routing::error::{OsrmErrorPayload, RoutingError};
use crate::sdk::routing::route::{LegSummary, RouteSummary};
use crate::sdk::routing::service::RoutingProvider;
use crate::sdk::util::rate_limit::Limiter;
use reqwest::Client;

const PROFILE: &str = "driving";

/// Client for an OSRM-compatible `route/v1` HTTP service.
pub struct OsrmProvider {
    client: Client,
    base_url: String,
    limiter: Limiter,
}

impl OsrmProvider {
    pub fn new(client: Client, base_url: impl Into<String>, limiter: Limiter) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter,
        }
    }

    fn route_url(&self, waypoints: &[Coord], full_overview: bool) -> String {
        let coords = waypoints
            .iter()
            .map(|c| format!("{},{}", c.lon, c.lat))
            .collect::<Vec<_>>()
            .join(";");
        let query = if full_overview {
            "overview=full&geometries=geojson"
        } else {
            "overview=false"
        };
        format!("{}/route/v1/{}/{}?{}", self.base_url, PROFILE, coords, query)
    }

    async fn fetch_route(
        &self,
        waypoints: &[Coord],
        full_overview: bool,
    ) -> Result<Option<Route>, RoutingError> {
        self.limiter.until_ready().await;
        let url = self.route_url(waypoints, full_overview);
        log::debug!("[OSRM] GET {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!("Failed to send route request. URL: {}\nError: {}", url, e);
                return Err(e.into());
            }
        };
        let status = response.status();
        let text = response.text().await?;

        parse_route_response(status.is_success(), &text)
    }
}

/// `Ok(None)` means the service answered but found no route.
fn parse_route_response(success: bool, text: &str) -> Result<Option<Route>, RoutingError> {
    if !success {
        // Try to parse the structured error first
        return match serde_json::from_str::<OsrmErrorPayload>(text) {
            Ok(payload) if payload.code == "NoRoute" => Ok(None),
            Ok(payload) => Err(RoutingError::ApiError {
                code: payload.code,
                message: payload.message.unwrap_or_default(),
            }),
            Err(_) => {
                log::error!("Routing service returned an unparseable error body: {}", text);
                Err(RoutingError::RawApiError(text.to_string()))
            }
        };
    }

    let response: RouteResponse = serde_json::from_str(text)?;
    match response.code.as_str() {
        "Ok" => Ok(response.routes.into_iter().next()),
        "NoRoute" => Ok(None),
        _ => Err(RoutingError::ApiError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        }),
    }
}

impl RoutingProvider for OsrmProvider {
    async fn driving_duration(&self, start: Coord, end: Coord) -> Result<Option<f64>, RoutingError> {
        if start == end {
            log::debug!("Start and end coordinates are identical. Returning zero duration.");
            return Ok(Some(0.0));
        }
        let route = self.fetch_route(&[start, end], false).await?;
        Ok(route.map(|r| r.duration))
    }

    async fn route_through(&self, waypoints: &[Coord]) -> Result<RouteSummary, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::NotEnoughWaypoints(waypoints.len()));
        }
        let route = self
            .fetch_route(waypoints, true)
            .await?
            .ok_or(RoutingError::NoRoute)?;
        Ok(into_summary(route))
    }
}

fn into_summary(route: Route) -> RouteSummary {
    RouteSummary {
        distance_km: route.distance / 1000.0,
        duration_secs: route.duration,
        legs: route
            .legs
            .iter()
            .map(|leg| LegSummary {
                distance_km: leg.distance / 1000.0,
                duration_secs: leg.duration,
            })
            .collect(),
        path: route
            .geometry
            .map(|line| {
                line.coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coord::new(lat, lon))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::util::rate_limit::per_second_limiter;
    use std::num::NonZeroU32;

    fn provider() -> OsrmProvider {
        OsrmProvider::new(
            Client::new(),
            "https://router.example.org/",
            per_second_limiter(NonZeroU32::MIN),
        )
    }

    #[test]
    fn url_puts_longitude_first() {
        let url = provider().route_url(
            &[Coord::new(-7.8, 110.37), Coord::new(-7.75, 110.49)],
            false,
        );
        assert_eq!(
            url,
            "https://router.example.org/route/v1/driving/110.37,-7.8;110.49,-7.75?overview=false"
        );
    }

    #[test]
    fn multi_stop_url_requests_geometry() {
        let url = provider().route_url(
            &[
                Coord::new(-7.8, 110.37),
                Coord::new(-7.75, 110.49),
                Coord::new(-7.6, 110.2),
            ],
            true,
        );
        assert!(url.contains("110.37,-7.8;110.49,-7.75;110.2,-7.6"));
        assert!(url.ends_with("?overview=full&geometries=geojson"));
    }

    #[test]
    fn parse_ok_response() {
        let body = r#"{"code":"Ok","routes":[{"distance":18342.5,"duration":1520.3,"legs":[{"distance":18342.5,"duration":1520.3}]}],"waypoints":[]}"#;
        let route = parse_route_response(true, body).unwrap().unwrap();
        assert_eq!(route.duration, 1520.3);
        assert_eq!(route.legs.len(), 1);
    }

    #[test]
    fn no_route_is_not_an_error() {
        let body = r#"{"code":"NoRoute","message":"Impossible route between points"}"#;
        assert!(parse_route_response(false, body).unwrap().is_none());
        assert!(parse_route_response(true, r#"{"code":"Ok","routes":[]}"#)
            .unwrap()
            .is_none());
    }

    #[test]
    fn structured_and_raw_errors() {
        let body = r#"{"code":"InvalidQuery","message":"Query string malformed"}"#;
        match parse_route_response(false, body) {
            Err(RoutingError::ApiError { code, message }) => {
                assert_eq!(code, "InvalidQuery");
                assert_eq!(message, "Query string malformed");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            parse_route_response(false, "<html>502 Bad Gateway</html>"),
            Err(RoutingError::RawApiError(_))
        ));
    }

    #[test]
    fn summary_converts_units_and_swaps_geometry() {
        let body = r#"{"code":"Ok","routes":[{"distance":2500.0,"duration":300.0,
            "legs":[{"distance":1000.0,"duration":120.0},{"distance":1500.0,"duration":180.0}],
            "geometry":{"type":"LineString","coordinates":[[110.37,-7.8],[110.4,-7.79]]}}]}"#;
        let route = parse_route_response(true, body).unwrap().unwrap();
        let summary = into_summary(route);
        assert_eq!(summary.distance_km, 2.5);
        assert_eq!(summary.duration_minutes(), 5.0);
        assert_eq!(summary.legs.len(), 2);
        assert_eq!(summary.legs[1].distance_km, 1.5);
        assert_eq!(summary.path[0], Coord::new(-7.8, 110.37));
    }

    #[tokio::test]
    async fn identical_points_skip_the_network() {
        let c = Coord::new(-7.8, 110.37);
        assert_eq!(provider().driving_duration(c, c).await.unwrap(), Some(0.0));
    }

    #[tokio::test]
    async fn single_waypoint_cannot_be_routed() {
        let res = provider().route_through(&[Coord::new(-7.8, 110.37)]).await;
        assert!(matches!(res, Err(RoutingError::NotEnoughWaypoints(1))));
    }
}
