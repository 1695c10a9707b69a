pub mod sdk;

pub use sdk::config::Config;
pub use sdk::corridor::{on_the_way, CorridorParams, OnTheWay};
pub use sdk::geo::Coord;
pub use sdk::pois::{load_pois, Poi};
pub use sdk::ranker::{rank_nearest, Candidate, RankMode, RankParams, Ranking};
pub use sdk::routing::{NominatimGeocoder, OsrmProvider};
pub use sdk::session::{RouteState, Session, SessionError};
