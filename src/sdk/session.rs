//! Per-user trip state and the handlers the front end drives it with.

use super::corridor::{on_the_way, CorridorParams, OnTheWay};
use super::geo::Coord;
use super::pois::Poi;
use super::ranker::{rank_nearest, Candidate, RankParams, Ranking};
use super::routing::error::{GeocodeError, RoutingError};
use super::routing::geocode::locate;
use super::routing::route::RouteSummary;
use super::routing::service::{Geocoder, Place, RoutingProvider};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Search for a starting address first")]
    NoOrigin,

    #[error("Choose a destination first")]
    NoDestination,

    #[error("There is no entry #{nth} in a list of {len}")]
    SelectionOutOfRange { nth: usize, len: usize },

    #[error("Location lookup failed: {0}")]
    Geocoding(#[from] GeocodeError),

    #[error("Route lookup failed: {0}")]
    Routing(#[from] RoutingError),
}

/// Identifies one issued search. Later searches get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    NoRoute,
    SingleLeg,
    MultiLeg,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub place: Place,
    pub ranking: Ranking,
}

/// Geocodes `query` and ranks the POIs around the match. Touches no session
/// state so several searches may be in flight at once.
pub async fn run_search<G, R>(
    query: &str,
    pois: &[Poi],
    geocoder: &G,
    router: &R,
    params: RankParams,
) -> Result<SearchOutcome, SessionError>
where
    G: Geocoder,
    R: RoutingProvider,
{
    let place = locate(geocoder, query).await?;
    log::info!("Location found: {} ({})", place.display_name, place.coord);
    let ranking = rank_nearest(place.coord, pois, router, params).await;
    Ok(SearchOutcome { place, ranking })
}

pub struct Session {
    pois: Vec<Poi>,
    rank_params: RankParams,
    corridor_params: CorridorParams,
    last_issued: u64,
    origin: Option<Place>,
    waypoints: Vec<Coord>,
    ranking: Ranking,
    on_the_way: Vec<OnTheWay>,
}

impl Session {
    pub fn new(pois: Vec<Poi>, rank_params: RankParams, corridor_params: CorridorParams) -> Self {
        Self {
            pois,
            rank_params,
            corridor_params,
            last_issued: 0,
            origin: None,
            waypoints: Vec::new(),
            ranking: Ranking::empty(),
            on_the_way: Vec::new(),
        }
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub fn rank_params(&self) -> RankParams {
        self.rank_params
    }

    pub fn origin(&self) -> Option<&Place> {
        self.origin.as_ref()
    }

    pub fn waypoints(&self) -> &[Coord] {
        &self.waypoints
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn on_the_way(&self) -> &[OnTheWay] {
        &self.on_the_way
    }

    pub fn state(&self) -> RouteState {
        match self.waypoints.len() {
            0 | 1 => RouteState::NoRoute,
            2 => RouteState::SingleLeg,
            _ => RouteState::MultiLeg,
        }
    }

    pub fn issue_search(&mut self) -> SearchTicket {
        self.last_issued += 1;
        SearchTicket(self.last_issued)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.last_issued
    }

    /// Applies a finished search unless a newer one was issued meanwhile.
    /// Returns whether the outcome was applied.
    pub fn apply_search(&mut self, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "Dropping stale search #{} (latest is #{})",
                ticket.0,
                self.last_issued
            );
            return false;
        }
        self.waypoints = vec![outcome.place.coord];
        self.origin = Some(outcome.place);
        self.ranking = outcome.ranking;
        self.on_the_way.clear();
        true
    }

    /// Runs a search and applies it. On failure the session is unchanged.
    pub async fn search<G, R>(
        &mut self,
        query: &str,
        geocoder: &G,
        router: &R,
    ) -> Result<bool, SessionError>
    where
        G: Geocoder,
        R: RoutingProvider,
    {
        let ticket = self.issue_search();
        let outcome = run_search(query, &self.pois, geocoder, router, self.rank_params).await?;
        Ok(self.apply_search(ticket, outcome))
    }

    /// Starts a fresh route from the origin to `destination`.
    pub fn choose_destination_at(&mut self, destination: Coord) -> Result<&[OnTheWay], SessionError> {
        let origin = self.origin.as_ref().ok_or(SessionError::NoOrigin)?.coord;
        self.waypoints = vec![origin, destination];
        self.refresh_on_the_way(origin, destination);
        Ok(&self.on_the_way)
    }

    /// Picks the `nth` entry of the nearest list as the destination.
    pub fn choose_destination(&mut self, nth: usize) -> Result<&[OnTheWay], SessionError> {
        let coord = pick(&self.ranking.nearest, nth)?.poi.coord;
        self.choose_destination_at(coord)
    }

    /// Picks the `nth` entry of the straight-line shortlist as the destination.
    pub fn choose_marker(&mut self, nth: usize) -> Result<&[OnTheWay], SessionError> {
        let coord = pick(&self.ranking.shortlist, nth)?.poi.coord;
        self.choose_destination_at(coord)
    }

    /// Appends `stop` to the route and refreshes the suggestions for the new leg.
    pub fn add_stop_at(&mut self, stop: Coord) -> Result<&[OnTheWay], SessionError> {
        if self.origin.is_none() {
            return Err(SessionError::NoOrigin);
        }
        if self.state() == RouteState::NoRoute {
            return Err(SessionError::NoDestination);
        }
        let leg_origin = self.waypoints[self.waypoints.len() - 1];
        self.waypoints.push(stop);
        self.refresh_on_the_way(leg_origin, stop);
        Ok(&self.on_the_way)
    }

    /// Appends the `nth` "on the way" suggestion to the route.
    pub fn add_stop(&mut self, nth: usize) -> Result<&[OnTheWay], SessionError> {
        let coord = self
            .on_the_way
            .get(nth)
            .ok_or(SessionError::SelectionOutOfRange {
                nth,
                len: self.on_the_way.len(),
            })?
            .poi
            .coord;
        self.add_stop_at(coord)
    }

    /// Driving route through every waypoint in order.
    pub async fn route<R: RoutingProvider>(&self, router: &R) -> Result<RouteSummary, SessionError> {
        if self.origin.is_none() {
            return Err(SessionError::NoOrigin);
        }
        if self.state() == RouteState::NoRoute {
            return Err(SessionError::NoDestination);
        }
        Ok(router.route_through(&self.waypoints).await?)
    }

    fn refresh_on_the_way(&mut self, origin: Coord, destination: Coord) {
        self.on_the_way = on_the_way(origin, destination, &self.pois, self.corridor_params);
        log::debug!(
            "{} POIs on the way from {} to {}",
            self.on_the_way.len(),
            origin,
            destination
        );
    }
}

fn pick(list: &[Candidate], nth: usize) -> Result<&Candidate, SessionError> {
    list.get(nth).ok_or(SessionError::SelectionOutOfRange {
        nth,
        len: list.len(),
    })
}
