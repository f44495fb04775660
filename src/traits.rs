//! Seams to the external providers.
//!
//! Each trait is implemented once over HTTP in this crate and can be
//! implemented by tests or by applications with their own backends.
//! Implementations make a single attempt per call and report failures;
//! deciding what to show instead is up to the caller.

use crate::coordinate::Coordinate;
use crate::environment::{AirQuality, WeatherReport};
use crate::error::ProviderError;
use crate::route::{RouteStep, TravelMode};
use crate::search::SearchResult;

/// A route as the directions provider describes it, before it is turned
/// into a [`crate::route::Route`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRoute {
    /// Geometry in (lat, lng) order.
    pub geometry: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub steps: Vec<RouteStep>,
}

/// Provides a path between two coordinates.
pub trait DirectionsProvider {
    fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<ProviderRoute, ProviderError>;
}

/// Provides ranked places for a free-text query.
pub trait PlaceSearchProvider {
    /// `near` biases (and bounds) the search around a location.
    fn search(
        &self,
        query: &str,
        near: Option<Coordinate>,
    ) -> Result<Vec<SearchResult>, ProviderError>;
}

pub trait WeatherProvider {
    fn current_weather(&self, city: &str) -> Result<WeatherReport, ProviderError>;
}

pub trait AirQualityProvider {
    fn air_quality(&self, city: &str) -> Result<AirQuality, ProviderError>;
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for &T {
    fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<ProviderRoute, ProviderError> {
        (**self).directions(origin, destination, mode)
    }
}

impl<T: PlaceSearchProvider + ?Sized> PlaceSearchProvider for &T {
    fn search(
        &self,
        query: &str,
        near: Option<Coordinate>,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        (**self).search(query, near)
    }
}
