//! Destination search over Nominatim.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::DataMode;
use crate::coordinate::Coordinate;
use crate::error::ProviderError;
use crate::haversine::distance_km;
use crate::traits::PlaceSearchProvider;

/// Nominatim carries no ratings; every result gets this one.
pub const DEFAULT_RATING: f64 = 4.0;

/// Half-width in degrees of the box a search is bounded to around the origin.
const VIEWBOX_HALF_DEG: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinate: Coordinate,
    /// Kilometres from the search origin, when one was given.
    pub distance_km: Option<f64>,
    pub address: Option<String>,
    pub place_id: Option<u64>,
    pub osm_type: Option<String>,
    pub osm_id: Option<u64>,
    pub rating: f64,
}

impl SearchResult {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            coordinate,
            distance_km: None,
            address: None,
            place_id: None,
            osm_type: None,
            osm_id: None,
            rating: DEFAULT_RATING,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub limit: u32,
    /// Comma-separated ISO 3166-1 codes, e.g. "in".
    pub country_codes: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            limit: 15,
            country_codes: Some("in".to_string()),
            user_agent: concat!("pathfinder-routing/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    fn query_params(&self, query: &str, near: Option<Coordinate>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", self.config.limit.to_string()),
            ("addressdetails", "1".to_string()),
            ("extratags", "1".to_string()),
        ];
        if let Some(codes) = &self.config.country_codes {
            params.push(("countrycodes", codes.clone()));
        }
        if let Some(origin) = near {
            params.push(("viewbox", viewbox(origin)));
            params.push(("bounded", "1".to_string()));
        }
        params
    }
}

/// `left,top,right,bottom` around `origin`.
fn viewbox(origin: Coordinate) -> String {
    format!(
        "{},{},{},{}",
        origin.lng - VIEWBOX_HALF_DEG,
        origin.lat + VIEWBOX_HALF_DEG,
        origin.lng + VIEWBOX_HALF_DEG,
        origin.lat - VIEWBOX_HALF_DEG
    )
}

impl PlaceSearchProvider for NominatimClient {
    fn search(
        &self,
        query: &str,
        near: Option<Coordinate>,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(%url, query, "searching places");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(query, near))
            .send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let places: Vec<NominatimPlace> = serde_json::from_str(&text)?;
        Ok(places.into_iter().filter_map(NominatimPlace::into_result).collect())
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    place_id: Option<u64>,
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    osm_type: Option<String>,
    osm_id: Option<u64>,
}

impl NominatimPlace {
    /// Entries whose coordinates do not parse are dropped.
    fn into_result(self) -> Option<SearchResult> {
        let lat = self.lat.trim().parse().ok()?;
        let lng = self.lon.trim().parse().ok()?;
        let coordinate = Coordinate::try_new(lat, lng)?;

        let name = self
            .display_name
            .split(',')
            .next()
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .or(self.name.filter(|name| !name.is_empty()))
            .unwrap_or_else(|| "Unknown Location".to_string());

        Some(SearchResult {
            name,
            kind: self.kind.unwrap_or_else(|| "place".to_string()),
            coordinate,
            distance_km: None,
            address: Some(self.display_name).filter(|address| !address.is_empty()),
            place_id: self.place_id,
            osm_type: self.osm_type,
            osm_id: self.osm_id,
            rating: DEFAULT_RATING,
        })
    }
}

/// Orders results nearest first. Results without a distance go last and
/// ties keep their provider order.
pub fn sort_by_distance(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        let a = a.distance_km.unwrap_or(f64::INFINITY);
        let b = b.distance_km.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
}

/// Search entry point used by the UI.
#[derive(Debug, Clone)]
pub struct DestinationSearch<P> {
    provider: P,
    data_mode: DataMode,
}

impl<P: PlaceSearchProvider> DestinationSearch<P> {
    pub fn new(provider: P, data_mode: DataMode) -> Self {
        Self { provider, data_mode }
    }

    /// Searches for `query`. With an origin, every result carries its
    /// distance and the list is ordered nearest first; without one the
    /// provider's order is kept.
    ///
    /// Never fails: a provider failure yields an empty list in live mode.
    /// Demo mode answers from [`sample_places`] without calling out.
    pub fn search(&self, query: &str, origin: Option<Coordinate>) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let results = match self.data_mode {
            DataMode::Demo => filter_samples(query),
            DataMode::Live => match self.provider.search(query, origin) {
                Ok(results) => results,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        query,
                        "place search failed, returning no results"
                    );
                    Vec::new()
                }
            },
        };

        rank(results, origin)
    }
}

fn rank(mut results: Vec<SearchResult>, origin: Option<Coordinate>) -> Vec<SearchResult> {
    if let Some(origin) = origin {
        for result in &mut results {
            result.distance_km = Some(distance_km(origin, result.coordinate));
        }
        sort_by_distance(&mut results);
    }
    results
}

fn filter_samples(query: &str) -> Vec<SearchResult> {
    let needle = query.to_lowercase();
    sample_places()
        .into_iter()
        .filter(|place| {
            place.name.to_lowercase().contains(&needle)
                || place.kind.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Fixed places around central Delhi served in demo mode.
pub fn sample_places() -> Vec<SearchResult> {
    const PLACES: &[(&str, &str, f64, f64, f64)] = &[
        ("Central Park", "park", 28.6145, 77.2095, 4.5),
        ("City Library", "library", 28.6142, 77.2098, 4.2),
        ("Shopping Mall", "mall", 28.6148, 77.2093, 4.0),
        ("Botanical Garden", "garden", 28.6150, 77.2100, 4.7),
        ("Coffee Shop", "cafe", 28.6139, 77.2090, 4.3),
        ("Metro Station", "station", 28.6140, 77.2092, 4.1),
        ("Hospital", "hospital", 28.6143, 77.2096, 4.4),
        ("Restaurant", "restaurant", 28.6146, 77.2094, 4.2),
        ("Bank", "bank", 28.6141, 77.2097, 4.0),
        ("School", "school", 28.6147, 77.2091, 4.3),
    ];

    PLACES
        .iter()
        .map(|&(name, kind, lat, lng, rating)| SearchResult {
            address: Some(format!("{name}, Delhi")),
            rating,
            ..SearchResult::new(name, kind, Coordinate::new(lat, lng))
        })
        .collect()
}

/// Identifies one issued search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Guards search-as-you-type against out-of-order responses.
///
/// Every outgoing search takes a ticket; only the response holding the
/// most recently issued ticket is applied.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Returns `results` if `ticket` is still the latest, otherwise drops them.
    pub fn accept<T>(&self, ticket: SearchTicket, results: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(results)
        } else {
            tracing::debug!(ticket = ticket.0, "discarding stale search response");
            None
        }
    }
}
