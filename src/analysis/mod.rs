//! Exploratory summaries printed before modelling

pub mod correlation;
pub mod describe;

pub use correlation::*;
pub use describe::*;
