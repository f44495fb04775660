//! Current weather and air quality for a city.
//!
//! Both lookups are optional decoration: a missing key or a failed call
//! yields the default reading for that half only.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::traits::{AirQualityProvider, WeatherProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature_c: i32,
    pub humidity_pct: u8,
    pub wind_kmh: i32,
    /// Short condition text, e.g. "Clouds".
    pub condition: String,
    pub icon: String,
    pub feels_like_c: i32,
}

impl Default for WeatherReport {
    fn default() -> Self {
        Self {
            temperature_c: 28,
            humidity_pct: 65,
            wind_kmh: 12,
            condition: "Partly Cloudy".to_string(),
            icon: "cloud".to_string(),
            feels_like_c: 30,
        }
    }
}

/// US EPA AQI bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
}

impl AqiLevel {
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthyForSensitiveGroups,
            151..=200 => AqiLevel::Unhealthy,
            _ => AqiLevel::VeryUnhealthy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AqiLevel::Good => "green",
            AqiLevel::Moderate => "yellow",
            AqiLevel::UnhealthyForSensitiveGroups => "orange",
            AqiLevel::Unhealthy => "red",
            AqiLevel::VeryUnhealthy => "purple",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Air quality is good. Enjoy your outdoor activities.",
            AqiLevel::Moderate => {
                "Air quality is acceptable. Sensitive individuals may experience symptoms."
            }
            AqiLevel::UnhealthyForSensitiveGroups => {
                "Members of sensitive groups may experience health effects."
            }
            AqiLevel::Unhealthy => "Everyone may begin to experience health effects.",
            AqiLevel::VeryUnhealthy => "Health warnings of emergency conditions.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQuality {
    pub aqi: u32,
    pub level: AqiLevel,
}

impl AirQuality {
    pub fn new(aqi: u32) -> Self {
        Self {
            aqi,
            level: AqiLevel::from_aqi(aqi),
        }
    }
}

impl Default for AirQuality {
    fn default() -> Self {
        Self::new(45)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReport {
    pub weather: WeatherReport,
    pub air_quality: AirQuality,
}

/// Fetches weather and air quality concurrently and waits for both.
///
/// Each half falls back to its own default when its provider fails.
pub fn fetch_environment<W, A>(weather: &W, air: &A, city: &str) -> EnvironmentReport
where
    W: WeatherProvider + Sync + ?Sized,
    A: AirQualityProvider + Sync + ?Sized,
{
    let (weather, air_quality) = rayon::join(
        || {
            weather.current_weather(city).unwrap_or_else(|err| {
                tracing::warn!(error = %err, city, "weather unavailable, using default");
                WeatherReport::default()
            })
        },
        || {
            air.air_quality(city).unwrap_or_else(|err| {
                tracing::warn!(error = %err, city, "air quality unavailable, using default");
                AirQuality::default()
            })
        },
    );

    EnvironmentReport { weather, air_quality }
}

/// Maps an OpenWeatherMap icon code to an icon name.
pub fn weather_icon(code: &str) -> &'static str {
    match code {
        "01d" => "sun",
        "01n" => "moon",
        "02d" => "cloud-sun",
        "02n" => "cloud-moon",
        "09d" | "09n" | "10d" | "10n" => "cloud-rain",
        "11d" | "11n" => "cloud-lightning",
        "13d" | "13n" => "cloud-snow",
        "50d" | "50n" => "cloud-fog",
        _ => "cloud",
    }
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    config: WeatherConfig,
    client: reqwest::blocking::Client,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl WeatherProvider for OpenWeatherClient {
    fn current_weather(&self, city: &str) -> Result<WeatherReport, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("OpenWeatherMap"))?;
        let url = format!("{}/data/2.5/weather", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(%url, city, "requesting weather");

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: OpenWeatherResponse = serde_json::from_str(&text)?;
        body.into_report()
    }
}

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    main: OpenWeatherMain,
    wind: OpenWeatherWind,
    #[serde(default)]
    weather: Vec<OpenWeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherWind {
    /// Metres per second.
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherCondition {
    main: String,
    icon: String,
}

impl OpenWeatherResponse {
    fn into_report(self) -> Result<WeatherReport, ProviderError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| {
                ProviderError::NoData("weather response has no conditions".to_string())
            })?;

        Ok(WeatherReport {
            temperature_c: self.main.temp.round() as i32,
            humidity_pct: self.main.humidity.clamp(0.0, 100.0).round() as u8,
            wind_kmh: (self.wind.speed * 3.6).round() as i32,
            icon: weather_icon(&condition.icon).to_string(),
            condition: condition.main,
            feels_like_c: self.main.feels_like.round() as i32,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AirQualityConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.waqi.info".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// World Air Quality Index feed client.
#[derive(Debug, Clone)]
pub struct WaqiClient {
    config: AirQualityConfig,
    client: reqwest::blocking::Client,
}

impl WaqiClient {
    pub fn new(config: AirQualityConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// `{base}/feed/{city}/`, with the city percent-encoded as a single
    /// path segment.
    fn feed_url(&self, city: &str) -> Result<reqwest::Url, ProviderError> {
        let mut url = reqwest::Url::parse(&self.config.base_url)
            .map_err(|err| ProviderError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ProviderError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(["feed", city, ""]);
        Ok(url)
    }
}

impl AirQualityProvider for WaqiClient {
    fn air_quality(&self, city: &str) -> Result<AirQuality, ProviderError> {
        let token = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("WAQI"))?;
        let url = self.feed_url(city)?;
        tracing::debug!(%url, "requesting air quality");

        let response = self.client.get(url).query(&[("token", token)]).send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: WaqiResponse = serde_json::from_str(&text)?;
        body.into_air_quality()
    }
}

#[derive(Debug, Deserialize)]
struct WaqiResponse {
    status: String,
    /// An object on success, an error message string otherwise.
    data: serde_json::Value,
}

impl WaqiResponse {
    fn into_air_quality(self) -> Result<AirQuality, ProviderError> {
        if self.status != "ok" {
            let message = self.data.as_str().unwrap_or("unknown error").to_string();
            return Err(ProviderError::NoData(message));
        }

        // Stations without a current reading report "-".
        let aqi = match &self.data["aqi"] {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| ProviderError::NoData("station has no current AQI".to_string()))?;

        Ok(AirQuality::new(aqi.min(u32::MAX as u64) as u32))
    }
}
