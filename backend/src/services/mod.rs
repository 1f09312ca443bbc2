//! Business logic services for the FishSpot backend

pub mod alerts;
pub mod notification;
pub mod score_cache;
pub mod scoring;

pub use alerts::{AlertEngine, AlertPolicy, AlertRunReport};
pub use score_cache::ScoreCache;
pub use scoring::{DynamicScore, ScoringService, ScoringSettings};
