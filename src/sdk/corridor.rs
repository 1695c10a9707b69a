use super::geo::{bearing_difference, Coord};
use super::pois::Poi;

pub const DEFAULT_BEARING_TOLERANCE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorridorParams {
    /// Maximum angle, exclusive, between the leg and the direction to a POI.
    pub tolerance_deg: f64,
}

impl Default for CorridorParams {
    fn default() -> Self {
        Self {
            tolerance_deg: DEFAULT_BEARING_TOLERANCE,
        }
    }
}

/// A POI lying roughly in the direction of travel.
#[derive(Debug, Clone, PartialEq)]
pub struct OnTheWay {
    pub index: usize,
    pub poi: Poi,
    pub bearing: f64,
}

/// POIs whose bearing from `origin` is within tolerance of the bearing
/// towards `destination`, in dataset order. POIs sitting exactly on either
/// end of the leg are left out.
pub fn on_the_way(
    origin: Coord,
    destination: Coord,
    pois: &[Poi],
    params: CorridorParams,
) -> Vec<OnTheWay> {
    let main_bearing = origin.bearing_to(&destination);
    pois.iter()
        .enumerate()
        .filter(|(_, poi)| poi.coord != origin && poi.coord != destination)
        .filter_map(|(index, poi)| {
            let bearing = origin.bearing_to(&poi.coord);
            is_on_course(main_bearing, bearing, params.tolerance_deg).then(|| OnTheWay {
                index,
                poi: poi.clone(),
                bearing,
            })
        })
        .collect()
}

/// Strictly less than `tolerance_deg` apart, wrapping at 360.
pub fn is_on_course(main_bearing: f64, bearing: f64, tolerance_deg: f64) -> bool {
    bearing_difference(main_bearing, bearing) < tolerance_deg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::ranker::tests::poi;

    const ORIGIN: Coord = Coord::new(-7.80, 110.37);

    fn names(found: &[OnTheWay]) -> Vec<&str> {
        found.iter().map(|o| o.poi.name.as_str()).collect()
    }

    #[test]
    fn course_tolerance_boundaries() {
        assert!(is_on_course(0.0, 0.0, 30.0));
        assert!(is_on_course(0.0, 359.0, 30.0));
        assert!(is_on_course(350.0, 5.0, 30.0));
        assert!(!is_on_course(0.0, 30.0, 30.0));
        assert!(!is_on_course(90.0, 60.0, 30.0));
        assert!(!is_on_course(10.0, 340.0, 30.0));
    }

    #[test]
    fn due_east_qualifies_due_south_does_not() {
        let destination = Coord::new(-7.80, 110.60);
        let pois = vec![
            poi("east", -7.80, 110.45),
            poi("south", -7.95, 110.37),
            poi("east-north-east", -7.77, 110.45),
        ];
        let found = on_the_way(ORIGIN, destination, &pois, CorridorParams::default());
        assert_eq!(names(&found), ["east", "east-north-east"]);
        assert!((found[0].bearing - 90.0).abs() < 0.1);
    }

    #[test]
    fn excludes_both_ends_of_the_leg() {
        let destination = Coord::new(-7.80, 110.60);
        let pois = vec![
            poi("origin", ORIGIN.lat, ORIGIN.lon),
            poi("destination", destination.lat, destination.lon),
            poi("between", -7.80, 110.50),
        ];
        let found = on_the_way(ORIGIN, destination, &pois, CorridorParams::default());
        assert_eq!(names(&found), ["between"]);
        assert_eq!(found[0].index, 2);
    }

    #[test]
    fn tolerance_is_exclusive() {
        let destination = Coord::new(-7.70, 110.37);
        let pois = vec![poi("north-east", -7.70, 110.40), poi("north", -7.60, 110.37)];
        let found = on_the_way(
            ORIGIN,
            destination,
            &pois,
            CorridorParams { tolerance_deg: 30.0 },
        );
        assert_eq!(names(&found), ["north-east", "north"]);

        // same POI with the tolerance set to its exact angle
        let angle = ORIGIN.bearing_to(&pois[0].coord);
        let found = on_the_way(
            ORIGIN,
            destination,
            &pois,
            CorridorParams {
                tolerance_deg: angle,
            },
        );
        assert_eq!(names(&found), ["north"]);
    }

    #[test]
    fn wraps_around_north() {
        // heading due north: a POI slightly west of north (bearing ~359) qualifies
        let destination = Coord::new(-7.60, 110.37);
        let pois = vec![
            poi("north", -7.70, 110.37),
            poi("west-of-north", -7.70, 110.368),
            poi("west", -7.80, 110.20),
        ];
        let found = on_the_way(ORIGIN, destination, &pois, CorridorParams::default());
        assert_eq!(names(&found), ["north", "west-of-north"]);
        assert!(found[1].bearing > 350.0);
    }

    #[test]
    fn keeps_dataset_order() {
        let destination = Coord::new(-7.80, 110.70);
        let pois = vec![
            poi("far", -7.80, 110.65),
            poi("near", -7.80, 110.40),
            poi("middle", -7.81, 110.50),
        ];
        let found = on_the_way(ORIGIN, destination, &pois, CorridorParams::default());
        assert_eq!(names(&found), ["far", "near", "middle"]);
    }
}
