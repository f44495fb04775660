//! Real central Delhi locations for test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. All are routable with the
//! India northern-zone extract.

use pathfinder_routing::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

pub const CONNAUGHT_PLACE: Location = Location::new("Connaught Place", 28.6315, 77.2167);
pub const INDIA_GATE: Location = Location::new("India Gate", 28.6129, 77.2295);
pub const LODHI_GARDEN: Location = Location::new("Lodhi Garden", 28.5931, 77.2197);
pub const JANTAR_MANTAR: Location = Location::new("Jantar Mantar", 28.6271, 77.2166);
pub const HUMAYUNS_TOMB: Location = Location::new("Humayun's Tomb", 28.5933, 77.2507);

/// Scenario points used across the resolver tests.
pub const WALK_ORIGIN: Location = Location::new("Your Location", 28.6139, 77.2090);
pub const WALK_DESTINATION: Location = Location::new("Botanical Garden", 28.6150, 77.2100);
