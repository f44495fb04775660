//! Haversine distance estimation (fallback when the router is unavailable).
//!
//! Uses great-circle distance, so it ignores roads entirely. The duration
//! heuristic is a fixed minutes-per-kilometre factor per travel mode: a
//! coarse estimate, not a simulation of any real movement.

use crate::coordinate::Coordinate;
use crate::route::TravelMode;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers, unrounded.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in kilometers, rounded to one decimal place.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    (haversine_km(from, to) * 10.0).round() / 10.0
}

impl TravelMode {
    /// Minutes per kilometre assumed by the fallback estimate
    /// (walking ~4 km/h, cycling ~12 km/h, driving ~30 km/h).
    pub fn minutes_per_km(&self) -> f64 {
        match self {
            TravelMode::Walking => 15.0,
            TravelMode::Cycling => 5.0,
            TravelMode::Driving => 2.0,
        }
    }
}

/// Convert a straight-line distance into whole minutes of travel.
pub fn estimate_minutes(distance_km: f64, mode: TravelMode) -> u32 {
    (distance_km.max(0.0) * mode.minutes_per_km()).round() as u32
}
