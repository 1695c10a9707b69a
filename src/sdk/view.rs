//! Plain-text rendering of session state for the terminal front end.

use super::corridor::OnTheWay;
use super::ranker::{Candidate, RankMode, Ranking};
use super::routing::route::RouteSummary;
use super::routing::service::Place;
use std::fmt::Write;

pub fn origin(place: &Place) -> String {
    format!("Your location: {} ({})", place.display_name, place.coord)
}

fn candidate_line(candidate: &Candidate, mode: RankMode) -> String {
    match (mode, candidate.duration_minutes()) {
        (RankMode::Duration, Some(minutes)) => format!(
            "{} - about {:.0} min driving",
            candidate.poi.name, minutes
        ),
        (RankMode::Duration, None) => format!("{} - no driving route", candidate.poi.name),
        (RankMode::Distance, _) => format!(
            "{} - straight line: {:.2} km",
            candidate.poi.name, candidate.distance_km
        ),
    }
}

pub fn ranking(ranking: &Ranking) -> String {
    if ranking.nearest.is_empty() {
        return "No attractions found nearby.".to_string();
    }
    let mut out = String::from("Nearest attractions:\n");
    for (i, candidate) in ranking.nearest.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, candidate_line(candidate, ranking.mode));
    }
    if ranking.mode == RankMode::Distance {
        out.push_str("  (driving times unavailable, sorted by distance)\n");
    }
    out
}

/// The straight-line shortlist, shown as the map markers.
pub fn markers(ranking: &Ranking) -> String {
    let mut out = String::from("Markers:\n");
    for (i, candidate) in ranking.shortlist.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} ({:.2} km) - {}",
            i + 1,
            candidate.poi.name,
            candidate.distance_km,
            candidate.poi.description
        );
    }
    out
}

pub fn on_the_way(list: &[OnTheWay]) -> String {
    if list.is_empty() {
        return "Nothing else on the way.".to_string();
    }
    let mut out = String::from("On the way:\n");
    for (i, item) in list.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, item.poi.name);
    }
    out
}

pub fn route(summary: &RouteSummary) -> String {
    let mut out = format!(
        "Route: {:.1} km, about {:.0} min\n",
        summary.distance_km,
        summary.duration_minutes()
    );
    for (i, leg) in summary.legs.iter().enumerate() {
        let _ = writeln!(
            out,
            "  leg {}: {:.1} km, {:.0} min",
            i + 1,
            leg.distance_km,
            leg.duration_secs / 60.0
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::ranker::tests::poi;
    use crate::sdk::routing::route::LegSummary;

    fn candidate(name: &str, distance_km: f64, duration_secs: Option<f64>) -> Candidate {
        Candidate {
            index: 0,
            poi: poi(name, -7.8, 110.4),
            distance_km,
            duration_secs,
        }
    }

    #[test]
    fn duration_ranking_shows_minutes() {
        let ranking = Ranking {
            mode: RankMode::Duration,
            nearest: vec![
                candidate("Tugu", 1.2, Some(360.0)),
                candidate("Goa Pindul", 40.0, None),
            ],
            shortlist: Vec::new(),
        };
        let text = super::ranking(&ranking);
        assert!(text.contains("1. Tugu - about 6 min driving"));
        assert!(text.contains("2. Goa Pindul - no driving route"));
    }

    #[test]
    fn distance_ranking_shows_kilometers() {
        let ranking = Ranking {
            mode: RankMode::Distance,
            nearest: vec![candidate("Tugu", 1.234, None)],
            shortlist: Vec::new(),
        };
        let text = super::ranking(&ranking);
        assert!(text.contains("1. Tugu - straight line: 1.23 km"));
        assert!(text.contains("sorted by distance"));
    }

    #[test]
    fn empty_lists() {
        assert_eq!(super::ranking(&Ranking::empty()), "No attractions found nearby.");
        assert_eq!(super::on_the_way(&[]), "Nothing else on the way.");
    }

    #[test]
    fn route_lists_legs() {
        let summary = RouteSummary {
            distance_km: 12.5,
            duration_secs: 1500.0,
            legs: vec![
                LegSummary {
                    distance_km: 5.0,
                    duration_secs: 600.0,
                },
                LegSummary {
                    distance_km: 7.5,
                    duration_secs: 900.0,
                },
            ],
            path: Vec::new(),
        };
        let text = super::route(&summary);
        assert!(text.starts_with("Route: 12.5 km, about 25 min"));
        assert!(text.contains("leg 2: 7.5 km, 15 min"));
    }
}
