//! Test fixtures for pathfinder-routing.
//!
//! Provides real Delhi locations and canned provider doubles.

#![allow(dead_code)]

pub mod delhi_locations;
pub mod providers;

pub use delhi_locations::*;
pub use providers::*;
