//! The built-in intro tour: the Olympic torch relay across France and its
//! overseas territories, ending on the Paris venues.

use foundation::geo::LngLat;

use crate::error::TourError;
use crate::waypoint::{Framing, Itinerary, Waypoint, WaypointTable};

/// Default framing for relay legs in mainland France and Greece.
pub const CRUISE: Framing = Framing {
    zoom: 7.0,
    pitch: 50.0,
    bearing: 340.0,
};

// Bearing 440 is kept as authored, outside [0, 360). The camera receives the
// raw value; `only_start_bearing_needs_normalization` pins it.
pub const START: Waypoint = Waypoint::new("", LngLat::new(5.0, 43.0), 2.0, 0.0, 440.0);

pub const OLYMPIA: Waypoint = Waypoint::framed("Olympia", LngLat::new(21.62536, 37.64471), CRUISE);
pub const MARSEILLE: Waypoint = Waypoint::framed("Marseille", LngLat::new(5.36455, 43.29527), CRUISE);
pub const BASTIA: Waypoint = Waypoint::new("Bastia", LngLat::new(9.450881, 42.697285), 7.0, 30.0, 320.0);
pub const PERPIGNAN: Waypoint = Waypoint::framed("Perpignan", LngLat::new(2.90064, 42.68751), CRUISE);
pub const NICE: Waypoint = Waypoint::framed("Nice", LngLat::new(7.26189, 43.71021), CRUISE);

pub const FRENCH_GUIANA: Waypoint =
    Waypoint::new("French Guiana", LngLat::new(-52.326, 4.9372), 5.0, 30.0, 320.0);
pub const GUADELOUPE: Waypoint = Waypoint::new("Guadeloupe", LngLat::new(-61.580002, 16.27), 5.0, 30.0, 340.0);
pub const MARTINIQUE: Waypoint = Waypoint::new("Martinique", LngLat::new(-61.083302, 14.6), 5.0, 30.0, 340.0);
pub const FRENCH_POLYNESIA: Waypoint =
    Waypoint::new("French Polynesia", LngLat::new(-149.569595, -17.535), 5.0, 30.0, 340.0);
pub const NEW_CALEDONIA: Waypoint =
    Waypoint::new("New Caledonia", LngLat::new(166.457993, -22.275801), 5.0, 30.0, 340.0);
pub const LA_REUNION: Waypoint = Waypoint::new("La Réunion", LngLat::new(55.448101, -20.878901), 5.0, 30.0, 340.0);

/// The primary view of the application; the tour always ends here.
pub const PARIS: Waypoint = Waypoint::new("Paris", LngLat::new(2.312772, 48.856091), 15.5, 55.0, 0.0);

/// Chronological order of the built-in tour.
pub fn builtin_waypoints() -> Vec<Waypoint> {
    vec![
        START,
        OLYMPIA,
        MARSEILLE,
        BASTIA,
        PERPIGNAN,
        NICE,
        FRENCH_GUIANA,
        GUADELOUPE,
        MARTINIQUE,
        FRENCH_POLYNESIA,
        NEW_CALEDONIA,
        LA_REUNION,
        PARIS,
    ]
}

pub fn builtin_table() -> Result<WaypointTable, TourError> {
    WaypointTable::new(builtin_waypoints())
}

/// The built-in tour with the same dwell at every stop.
pub fn builtin_itinerary(dwell_s: f64) -> Result<Itinerary, TourError> {
    Itinerary::uniform(builtin_table()?, dwell_s)
}

#[cfg(test)]
mod tests {
    use super::{PARIS, START, builtin_itinerary, builtin_table, builtin_waypoints};
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_table_validates() {
        let table = builtin_table().unwrap();
        assert_eq!(table.len(), builtin_waypoints().len());
        for wp in &table {
            assert!(wp.center.is_valid(), "{} has invalid center", wp.name);
        }
    }

    #[test]
    fn starts_without_caption_and_ends_in_paris() {
        let table = builtin_table().unwrap();
        assert_eq!(table.first(), &START);
        assert!(!table.first().has_caption());
        assert_eq!(table.last(), &PARIS);
    }

    #[test]
    fn only_start_bearing_needs_normalization() {
        let out_of_range: Vec<_> = builtin_waypoints()
            .into_iter()
            .filter(|w| w.bearing != w.normalized_bearing())
            .map(|w| (w.bearing, w.normalized_bearing()))
            .collect();
        assert_eq!(out_of_range, vec![(440.0, 80.0)]);
    }

    #[test]
    fn builtin_itinerary_uses_uniform_dwell() {
        let it = builtin_itinerary(2.5).unwrap();
        assert!((0..it.len()).all(|i| it.dwell_s(i) == Some(2.5)));
        assert!(builtin_itinerary(-1.0).is_err());
    }
}
