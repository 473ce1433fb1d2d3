//! hub-routing core
//!
//! Nearest-neighbor route ordering and route schedule validation for a
//! logistics hub network, with the routing provider and hub database
//! injected through traits.

pub mod traits;
pub mod error;
pub mod nearest_neighbor;
pub mod validation;
pub mod planner;
pub mod goong;
pub mod supabase;
pub mod haversine;
pub mod config;
