pub mod config;
pub mod corridor;
pub mod geo;
pub mod pois;
pub mod ranker;
pub mod routing;
pub mod session;
pub mod util;
pub mod view;
