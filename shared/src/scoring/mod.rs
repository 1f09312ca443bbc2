//! Fishability scoring
//!
//! Leaves first: [`curves`] maps single measurements onto a signed
//! contribution, [`calculator`] turns a full set of conditions into the
//! 0-100 fish activity index, and [`blend`] combines that index with the
//! spot's static score and live water signals.

pub mod blend;
pub mod calculator;
pub mod curves;

pub use blend::*;
pub use calculator::*;
