//! Shared types and scoring logic for FishSpot
//!
//! This crate contains the pure domain layer shared between the backend and
//! the web/mobile front-end (via WASM): the data model, the factor curves,
//! the fish activity calculator and the fishability blend. Nothing in here
//! performs I/O.

pub mod models;
pub mod scoring;
pub mod types;
pub mod validation;

pub use models::*;
pub use scoring::*;
pub use types::*;
pub use validation::*;
