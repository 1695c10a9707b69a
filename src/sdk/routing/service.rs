use super::error::{GeocodeError, RoutingError};
use super::route::RouteSummary;
use crate::sdk::geo::Coord;
use std::future::Future;

/// A geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub coord: Coord,
    pub display_name: String,
}

pub trait Geocoder {
    /// Resolves free text to zero or more places, best match first.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Place>, GeocodeError>>;
}

pub trait RoutingProvider {
    /// Driving duration in seconds, `None` when the network has no route.
    fn driving_duration(
        &self,
        start: Coord,
        end: Coord,
    ) -> impl Future<Output = Result<Option<f64>, RoutingError>>;

    /// A route visiting every waypoint in order.
    fn route_through(
        &self,
        waypoints: &[Coord],
    ) -> impl Future<Output = Result<RouteSummary, RoutingError>>;
}
