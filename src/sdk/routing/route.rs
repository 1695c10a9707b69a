use crate::sdk::geo::Coord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegSummary {
    pub distance_km: f64,
    pub duration_secs: f64,
}

/// A driven route through two or more waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_secs: f64,
    pub legs: Vec<LegSummary>,
    /// Road geometry, empty when the service didn't send one.
    pub path: Vec<Coord>,
}

impl RouteSummary {
    pub fn duration_minutes(&self) -> f64 {
        self.duration_secs / 60.0
    }
}
