//! Application configuration assembled from environment variables.
//!
//! | Variable | Effect |
//! |---|---|
//! | `PATHFINDER_DATA_MODE` | `live` (default) or `demo` |
//! | `PATHFINDER_OSRM_URL` | directions base URL |
//! | `PATHFINDER_NOMINATIM_URL` | place search base URL |
//! | `PATHFINDER_HTTP_TIMEOUT_SECS` | per-call timeout for every provider |
//! | `OPENWEATHER_API_KEY` | weather key; absent means default weather |
//! | `WAQI_API_KEY` | air quality key; absent means default AQI |

use std::env;

use serde::{Deserialize, Serialize};

use crate::environment::{AirQualityConfig, WeatherConfig};
use crate::osrm::OsrmConfig;
use crate::resolver::ResolverConfig;
use crate::search::NominatimConfig;

/// Whether providers are contacted at all.
///
/// `Live` calls every provider and degrades per call on failure (routes
/// become straight lines, searches come back empty). `Demo` never touches
/// the network and serves synthetic routes and sample places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    #[default]
    Live,
    Demo,
}

impl DataMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "live" => Some(DataMode::Live),
            "demo" | "mock" => Some(DataMode::Demo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub data_mode: DataMode,
    pub osrm: OsrmConfig,
    pub nominatim: NominatimConfig,
    pub weather: WeatherConfig,
    pub air_quality: AirQualityConfig,
    pub resolver: ResolverConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = non_empty("PATHFINDER_DATA_MODE") {
            match DataMode::parse(&raw) {
                Some(mode) => config.data_mode = mode,
                None => tracing::warn!(value = %raw, "unknown PATHFINDER_DATA_MODE, staying live"),
            }
        }
        config.resolver.data_mode = config.data_mode;

        if let Some(url) = non_empty("PATHFINDER_OSRM_URL") {
            config.osrm.base_url = url;
        }
        if let Some(url) = non_empty("PATHFINDER_NOMINATIM_URL") {
            config.nominatim.base_url = url;
        }
        if let Some(raw) = non_empty("PATHFINDER_HTTP_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config.osrm.timeout_secs = secs;
                    config.nominatim.timeout_secs = secs;
                    config.weather.timeout_secs = secs;
                    config.air_quality.timeout_secs = secs;
                }
                _ => tracing::warn!(
                    value = %raw,
                    "invalid PATHFINDER_HTTP_TIMEOUT_SECS, keeping default"
                ),
            }
        }

        config.weather.api_key = non_empty("OPENWEATHER_API_KEY");
        config.air_quality.api_key = non_empty("WAQI_API_KEY");

        config
    }
}
