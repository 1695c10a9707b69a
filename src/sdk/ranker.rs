//! Two-stage nearest-POI ranking.
//!
//! Stage one keeps the `prefilter` POIs closest in a straight line. Stage two
//! asks the router for the driving time to each of them at once and orders
//! them by it. A POI outside the straight-line shortlist is never considered,
//! even if it would be quicker to drive to.

use super::geo::Coord;
use super::pois::Poi;
use super::routing::service::RoutingProvider;
use futures::future::join_all;

pub const DEFAULT_PREFILTER: usize = 20;
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankParams {
    /// Candidates kept after the straight-line pass.
    pub prefilter: usize,
    /// Results returned.
    pub top_k: usize,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            prefilter: DEFAULT_PREFILTER,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// A POI annotated for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Position in the loaded collection.
    pub index: usize,
    pub poi: Poi,
    pub distance_km: f64,
    /// `None` when unknown or when no route exists.
    pub duration_secs: Option<f64>,
}

impl Candidate {
    pub fn duration_minutes(&self) -> Option<f64> {
        self.duration_secs.map(|secs| secs / 60.0)
    }

    fn duration_key(&self) -> f64 {
        self.duration_secs.unwrap_or(f64::INFINITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMode {
    /// Ordered by driving duration.
    Duration,
    /// Every travel-time lookup failed; ordered by straight-line distance.
    Distance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub mode: RankMode,
    pub nearest: Vec<Candidate>,
    /// Stage-one candidates in straight-line order.
    pub shortlist: Vec<Candidate>,
}

impl Ranking {
    pub fn empty() -> Self {
        Self {
            mode: RankMode::Duration,
            nearest: Vec::new(),
            shortlist: Vec::new(),
        }
    }
}

/// The `limit` POIs closest to `origin` in a straight line, nearest first.
pub fn prefilter(origin: Coord, pois: &[Poi], limit: usize) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = pois
        .iter()
        .enumerate()
        .map(|(index, poi)| Candidate {
            index,
            poi: poi.clone(),
            distance_km: origin.distance_km(&poi.coord),
            duration_secs: None,
        })
        .collect();
    // stable: equal distances keep dataset order
    candidates.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    candidates.truncate(limit);
    candidates
}

pub async fn rank_nearest<R: RoutingProvider>(
    origin: Coord,
    pois: &[Poi],
    router: &R,
    params: RankParams,
) -> Ranking {
    let shortlist = prefilter(origin, pois, params.prefilter);
    if shortlist.is_empty() {
        return Ranking::empty();
    }

    let lookups = shortlist
        .iter()
        .map(|candidate| router.driving_duration(origin, candidate.poi.coord));
    let results = join_all(lookups).await;

    if results.iter().all(Result::is_err) {
        if let Some(Err(err)) = results.first() {
            log::warn!(
                "All {} travel-time lookups failed ({}). Falling back to straight-line distance.",
                results.len(),
                err
            );
        }
        let nearest = shortlist.iter().take(params.top_k).cloned().collect();
        return Ranking {
            mode: RankMode::Distance,
            nearest,
            shortlist,
        };
    }

    let mut ranked: Vec<Candidate> = shortlist
        .iter()
        .cloned()
        .zip(results)
        .map(|(mut candidate, result)| {
            candidate.duration_secs = match result {
                Ok(duration) => duration,
                Err(err) => {
                    log::debug!("No travel time for {}: {}", candidate.poi.name, err);
                    None
                }
            };
            candidate
        })
        .collect();
    ranked.sort_by(|a, b| a.duration_key().total_cmp(&b.duration_key()));
    ranked.truncate(params.top_k);

    Ranking {
        mode: RankMode::Duration,
        nearest: ranked,
        shortlist,
    }
}
