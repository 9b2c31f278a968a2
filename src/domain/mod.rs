//! Typed schema of the price file

pub mod calendar;
pub mod series;

pub use calendar::*;
pub use series::*;
