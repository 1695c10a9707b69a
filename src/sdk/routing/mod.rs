pub mod error;
pub mod geocode;
pub mod provider;
pub mod route;
pub mod service;

pub use error::{GeocodeError, RoutingError};
pub use geocode::{locate, NominatimGeocoder};
pub use provider::OsrmProvider;
pub use route::{LegSummary, RouteSummary};
pub use service::{Geocoder, Place, RoutingProvider};
