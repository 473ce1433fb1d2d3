//! Test fixtures for hub-routing.
//!
//! Provides realistic test data including:
//! - Real Mekong delta hub locations around Can Tho
//! - In-memory fakes for the oracle, hub directory and schedule store

#![allow(dead_code)]

pub mod fakes;
pub mod mekong_hubs;

pub use fakes::*;
pub use mekong_hubs::*;
