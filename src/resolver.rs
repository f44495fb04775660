//! Route resolution with graceful degradation.
//!
//! [`RouteResolver::resolve`] always returns a [`Route`]. It asks the
//! directions provider once; if that fails for any reason the caller gets
//! a straight line between the two coordinates with a heuristic duration,
//! in the same shape as a real route and tagged [`RouteSource::Synthetic`].

use crate::config::DataMode;
use crate::coordinate::Coordinate;
use crate::error::ProviderError;
use crate::haversine::{distance_km, estimate_minutes};
use crate::polyline;
use crate::route::{PointRole, Route, RoutePoint, RouteSource, TravelMode};
use crate::traits::{DirectionsProvider, ProviderRoute};

/// Placeholder scores. Directions providers have no notion of safety or
/// environmental quality, so every route gets these fixed values.
pub const ENDPOINT_SAFETY: f64 = 8.0;
pub const ENDPOINT_ENVIRONMENTAL: f64 = 7.0;
pub const WAYPOINT_SAFETY: f64 = 7.0;
pub const WAYPOINT_ENVIRONMENTAL: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// `Demo` skips the provider and always synthesizes.
    pub data_mode: DataMode,
    pub origin_label: String,
    pub destination_label: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            data_mode: DataMode::Live,
            origin_label: "Your Location".to_string(),
            destination_label: "Destination".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteResolver<P> {
    provider: P,
    config: ResolverConfig,
}

impl<P: DirectionsProvider> RouteResolver<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ResolverConfig::default())
    }

    pub fn with_config(provider: P, config: ResolverConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a route, falling back to a straight line on any failure.
    ///
    /// Endpoints outside the coordinate ranges never reach the provider.
    pub fn resolve(&self, origin: Coordinate, destination: Coordinate, mode: TravelMode) -> Route {
        self.resolve_to(origin, destination, &self.config.destination_label, mode)
    }

    /// Like [`resolve`](Self::resolve), naming the end point `label`.
    pub fn resolve_to(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        label: &str,
        mode: TravelMode,
    ) -> Route {
        if self.config.data_mode == DataMode::Demo {
            return self.synthesize(origin, destination, label, mode);
        }
        if !origin.is_valid() || !destination.is_valid() {
            tracing::warn!(
                ?origin,
                ?destination,
                "invalid route endpoints, using straight-line route"
            );
            return self.synthesize(origin, destination, label, mode);
        }

        match self.try_resolve(origin, destination, label, mode) {
            Ok(route) => route,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    transport = err.is_transport(),
                    profile = mode.profile(),
                    "directions unavailable, using straight-line route"
                );
                self.synthesize(origin, destination, label, mode)
            }
        }
    }

    /// Asks the provider once and normalizes its answer, surfacing the
    /// failure instead of falling back.
    pub fn try_resolve(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        label: &str,
        mode: TravelMode,
    ) -> Result<Route, ProviderError> {
        let provided = self.provider.directions(origin, destination, mode)?;
        let no_route = |message: &str| ProviderError::NoRoute {
            code: "Ok".to_string(),
            message: message.to_string(),
        };
        if provided.geometry.is_empty() {
            return Err(no_route("route has empty geometry"));
        }
        if !provided.geometry.iter().all(Coordinate::is_valid) {
            return Err(no_route("route geometry has out-of-range coordinates"));
        }
        let route = self.normalize(provided, destination, label, mode);
        tracing::info!(
            distance_km = route.distance_km,
            duration_min = route.duration_min,
            points = route.points.len(),
            "resolved route from provider"
        );
        Ok(route)
    }

    fn normalize(
        &self,
        provided: ProviderRoute,
        destination: Coordinate,
        label: &str,
        mode: TravelMode,
    ) -> Route {
        let mut geometry = provided.geometry;
        if geometry.len() == 1 {
            geometry.push(destination);
        }

        let last = geometry.len() - 1;
        let points: Vec<RoutePoint> = geometry
            .iter()
            .enumerate()
            .map(|(index, coordinate)| {
                let (name, role) = if index == 0 {
                    (self.config.origin_label.clone(), PointRole::Start)
                } else if index == last {
                    (label.to_string(), PointRole::End)
                } else {
                    (format!("Waypoint {index}"), PointRole::Waypoint)
                };
                let (safety_score, environmental_score) = match role {
                    PointRole::Waypoint => (WAYPOINT_SAFETY, WAYPOINT_ENVIRONMENTAL),
                    _ => (ENDPOINT_SAFETY, ENDPOINT_ENVIRONMENTAL),
                };
                RoutePoint {
                    coordinate: *coordinate,
                    name,
                    role,
                    safety_score,
                    environmental_score,
                }
            })
            .collect();

        Route {
            polyline: polyline::encode(&geometry),
            points,
            // Whole metres, as the provider reports them.
            distance_km: provided.distance_m.max(0.0).round() / 1000.0,
            duration_min: (provided.duration_s.max(0.0) / 60.0).round() as u32,
            mode,
            steps: provided.steps,
            safety_score: ENDPOINT_SAFETY,
            environmental_score: ENDPOINT_ENVIRONMENTAL,
            source: RouteSource::Provider,
        }
    }

    fn synthesize(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        label: &str,
        mode: TravelMode,
    ) -> Route {
        synthetic_route(origin, destination, mode, &self.config.origin_label, label)
    }
}

/// Straight-line route between two points.
///
/// Distance is the rounded haversine distance and duration comes from the
/// per-mode minutes-per-kilometre heuristic. The polyline is left empty.
/// A non-finite endpoint yields a zero distance.
pub fn synthetic_route(
    origin: Coordinate,
    destination: Coordinate,
    mode: TravelMode,
    origin_label: &str,
    destination_label: &str,
) -> Route {
    let distance = match distance_km(origin, destination) {
        d if d.is_finite() => d.max(0.0),
        _ => 0.0,
    };
    let endpoint = |coordinate, name: &str, role| RoutePoint {
        coordinate,
        name: name.to_string(),
        role,
        safety_score: ENDPOINT_SAFETY,
        environmental_score: ENDPOINT_ENVIRONMENTAL,
    };

    Route {
        points: vec![
            endpoint(origin, origin_label, PointRole::Start),
            endpoint(destination, destination_label, PointRole::End),
        ],
        distance_km: distance,
        duration_min: estimate_minutes(distance, mode),
        mode,
        polyline: String::new(),
        steps: Vec::new(),
        safety_score: ENDPOINT_SAFETY,
        environmental_score: ENDPOINT_ENVIRONMENTAL,
        source: RouteSource::Synthetic,
    }
}
