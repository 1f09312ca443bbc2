//! Domain models for FishSpot

mod activity;
mod alert;
mod notification;
mod spot;
mod water;
mod weather;

pub use activity::*;
pub use alert::*;
pub use notification::*;
pub use spot::*;
pub use water::*;
pub use weather::*;
