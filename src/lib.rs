//! pathfinder-routing core
//!
//! Route adapter for a map-based navigation UI: polyline encoding,
//! great-circle distance, directions with a straight-line fallback, place
//! search and environment lookups over public HTTP providers.

pub mod config;
pub mod coordinate;
pub mod environment;
pub mod error;
pub mod haversine;
pub mod osrm;
pub mod osrm_data;
pub mod polyline;
pub mod resolver;
pub mod route;
pub mod search;
pub mod traits;

pub use coordinate::Coordinate;
pub use error::ProviderError;
pub use resolver::RouteResolver;
pub use route::{Route, RoutePoint, TravelMode};
