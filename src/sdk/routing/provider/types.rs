use serde::Deserialize;

// --- Data structures for parsing OSRM route responses ---

#[derive(Deserialize, Debug)]
pub struct RouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Deserialize, Debug)]
pub struct Route {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub geometry: Option<LineString>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Leg {
    pub distance: f64,
    pub duration: f64,
}

#[derive(Deserialize, Debug)]
pub struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}
