use serde::Deserialize;
use thiserror::Error;

// Body of a non-`Ok` OSRM response
#[derive(Deserialize, Debug)]
pub struct OsrmErrorPayload {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("A route needs at least two waypoints, got {0}")]
    NotEnoughWaypoints(usize),

    #[error("No route found between the waypoints")]
    NoRoute,

    // Structured error from the routing service
    #[error("API Error ({code}): {message}")]
    ApiError { code: String, message: String },

    // A fallback for when the error body isn't in the expected JSON format
    #[error("Unstructured API Error: {0}")]
    RawApiError(String),

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("No location found for \"{0}\"")]
    NotFound(String),

    #[error("Geocoder returned an invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Unstructured API Error ({status}): {body}")]
    RawApiError { status: u16, body: String },

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}
