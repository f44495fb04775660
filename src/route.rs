//! Route model produced by the resolver.
//!
//! A [`Route`] is built once per request and never mutated; a new request
//! produces a new route.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::polyline;

/// How the traveller moves. Doubles as the directions profile name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Cycling,
    Driving,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [
        TravelMode::Walking,
        TravelMode::Cycling,
        TravelMode::Driving,
    ];

    /// Profile segment used in directions requests.
    pub fn profile(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
            TravelMode::Driving => "driving",
        }
    }

    /// Parses a mode name. Unknown names (e.g. "transit") map to driving,
    /// the closest profile a road router offers.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "walking" | "walk" | "foot" => TravelMode::Walking,
            "cycling" | "bike" | "bicycle" => TravelMode::Cycling,
            _ => TravelMode::Driving,
        }
    }
}

/// Position of a point along its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointRole {
    Start,
    Waypoint,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub coordinate: Coordinate,
    pub name: String,
    pub role: PointRole,
    /// 0..=10.
    pub safety_score: f64,
    /// 0..=10.
    pub environmental_score: f64,
}

/// One turn-by-turn instruction from the directions provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_m: f64,
    pub duration_s: f64,
    pub maneuver: String,
    pub location: Option<Coordinate>,
}

/// Where a route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    /// Normalized from a directions provider response.
    Provider,
    /// Straight line between origin and destination.
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// First point is the start, last point is the end. Never empty.
    pub points: Vec<RoutePoint>,
    pub distance_km: f64,
    pub duration_min: u32,
    pub mode: TravelMode,
    /// Encoded geometry. Empty for synthetic routes, where the points are
    /// the line.
    pub polyline: String,
    pub steps: Vec<RouteStep>,
    pub safety_score: f64,
    pub environmental_score: f64,
    pub source: RouteSource,
}

impl Route {
    pub fn start(&self) -> Option<&RoutePoint> {
        self.points.first()
    }

    pub fn end(&self) -> Option<&RoutePoint> {
        self.points.last()
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == RouteSource::Synthetic
    }

    /// Coordinates to draw.
    ///
    /// Decodes the stored polyline; when it is empty or corrupt, the raw
    /// point sequence is used instead.
    pub fn geometry(&self) -> Vec<Coordinate> {
        if !self.polyline.is_empty() {
            match polyline::decode(&self.polyline) {
                Ok(points) if !points.is_empty() => return points,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "stored polyline unreadable, drawing raw points");
                }
            }
        }
        self.points.iter().map(|p| p.coordinate).collect()
    }

    /// Human-readable distance: metres below one kilometre, otherwise
    /// kilometres with one decimal.
    pub fn display_distance(&self) -> String {
        format_distance(self.distance_km)
    }
}

pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} m", (distance_km * 1000.0).round() as i64)
    } else {
        format!("{:.1} km", distance_km)
    }
}

/// Thresholds for narrowing a list of candidate routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteFilter {
    pub safety_min: f64,
    pub environmental_min: f64,
    pub max_distance_km: f64,
    pub max_duration_min: u32,
    /// `None` admits every mode.
    pub mode: Option<TravelMode>,
}

impl Default for RouteFilter {
    fn default() -> Self {
        Self {
            safety_min: 7.0,
            environmental_min: 6.0,
            max_distance_km: 5.0,
            max_duration_min: 60,
            mode: None,
        }
    }
}

impl RouteFilter {
    pub fn admits(&self, route: &Route) -> bool {
        route.safety_score >= self.safety_min
            && route.environmental_score >= self.environmental_min
            && route.distance_km <= self.max_distance_km
            && route.duration_min <= self.max_duration_min
            && self.mode.is_none_or(|mode| mode == route.mode)
    }

    pub fn apply<'a>(&self, routes: &'a [Route]) -> Vec<&'a Route> {
        routes.iter().filter(|route| self.admits(route)).collect()
    }
}
