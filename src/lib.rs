//! Econometric analysis of European day-ahead and aFRR balancing prices.
//!
//! The crate loads a 15-minute price file, engineers difference and lag
//! features, fits a family of OLS and autoregressive specifications on the
//! first eleven months and scores them out of sample on the twelfth.

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod models;
pub mod pipeline;
#[cfg(feature = "plots")]
pub mod plotting;
pub mod telemetry;
