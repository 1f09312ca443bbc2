//! HTTP request handlers

pub mod activity;
pub mod cron;
pub mod health;
pub mod spots;

pub use activity::*;
pub use cron::*;
pub use health::*;
pub use spots::*;
