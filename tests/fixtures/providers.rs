//! Provider doubles implementing the seam traits.

use std::sync::atomic::{AtomicUsize, Ordering};

use pathfinder_routing::Coordinate;
use pathfinder_routing::environment::{AirQuality, WeatherReport};
use pathfinder_routing::error::ProviderError;
use pathfinder_routing::route::TravelMode;
use pathfinder_routing::search::SearchResult;
use pathfinder_routing::traits::{
    AirQualityProvider, DirectionsProvider, PlaceSearchProvider, ProviderRoute, WeatherProvider,
};

/// Directions provider that answers every request with the same outcome.
pub struct ScriptedDirections {
    outcome: fn() -> Result<ProviderRoute, ProviderError>,
    calls: AtomicUsize,
}

impl ScriptedDirections {
    pub fn new(outcome: fn() -> Result<ProviderRoute, ProviderError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DirectionsProvider for ScriptedDirections {
    fn directions(
        &self,
        _: Coordinate,
        _: Coordinate,
        _: TravelMode,
    ) -> Result<ProviderRoute, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }
}

/// A transport-level failure, produced by a request that cannot connect.
pub fn transport_error() -> ProviderError {
    let err = reqwest::blocking::Client::new()
        .get("http://127.0.0.1:9/unreachable")
        .timeout(std::time::Duration::from_millis(200))
        .send()
        .expect_err("nothing listens on the discard port");
    ProviderError::Transport(err)
}

/// Place search returning a fixed list, or failing.
pub struct FixedPlaces {
    pub results: Option<Vec<SearchResult>>,
    calls: AtomicUsize,
}

impl FixedPlaces {
    pub fn ok(results: Vec<SearchResult>) -> Self {
        Self {
            results: Some(results),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            results: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PlaceSearchProvider for FixedPlaces {
    fn search(&self, _: &str, _: Option<Coordinate>) -> Result<Vec<SearchResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results.clone().ok_or(ProviderError::Status {
            status: 429,
            body: "rate limited".to_string(),
        })
    }
}

pub struct FixedWeather(pub Option<WeatherReport>);

impl WeatherProvider for FixedWeather {
    fn current_weather(&self, _: &str) -> Result<WeatherReport, ProviderError> {
        self.0.clone().ok_or(ProviderError::MissingApiKey("OpenWeatherMap"))
    }
}

pub struct FixedAir(pub Option<u32>);

impl AirQualityProvider for FixedAir {
    fn air_quality(&self, _: &str) -> Result<AirQuality, ProviderError> {
        self.0
            .map(AirQuality::new)
            .ok_or_else(|| ProviderError::NoData("Unknown station".to_string()))
    }
}
