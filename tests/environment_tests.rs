//! Combined weather and air-quality lookups.

mod fixtures;

use pathfinder_routing::environment::{AirQuality, AqiLevel, WeatherReport, fetch_environment};

use fixtures::{FixedAir, FixedWeather};

fn hazy_delhi() -> WeatherReport {
    WeatherReport {
        temperature_c: 33,
        humidity_pct: 40,
        wind_kmh: 9,
        condition: "Haze".to_string(),
        icon: "cloud-fog".to_string(),
        feels_like_c: 36,
    }
}

#[test]
fn both_providers_succeed() {
    let report = fetch_environment(
        &FixedWeather(Some(hazy_delhi())),
        &FixedAir(Some(162)),
        "Delhi",
    );
    assert_eq!(report.weather, hazy_delhi());
    assert_eq!(report.air_quality.aqi, 162);
    assert_eq!(report.air_quality.level, AqiLevel::Unhealthy);
}

#[test]
fn weather_failure_does_not_block_air_quality() {
    let report = fetch_environment(&FixedWeather(None), &FixedAir(Some(88)), "Delhi");
    assert_eq!(report.weather, WeatherReport::default());
    assert_eq!(report.air_quality, AirQuality::new(88));
}

#[test]
fn air_quality_failure_does_not_block_weather() {
    let report = fetch_environment(&FixedWeather(Some(hazy_delhi())), &FixedAir(None), "Delhi");
    assert_eq!(report.weather, hazy_delhi());
    assert_eq!(report.air_quality, AirQuality::default());
    assert_eq!(report.air_quality.level, AqiLevel::Good);
}

#[test]
fn both_fail_to_defaults() {
    let report = fetch_environment(&FixedWeather(None), &FixedAir(None), "Nowhere");
    assert_eq!(report.weather, WeatherReport::default());
    assert_eq!(report.air_quality, AirQuality::default());
}
