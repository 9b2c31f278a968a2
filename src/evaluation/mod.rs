//! Out-of-sample evaluation of the fitted specifications

pub mod evaluator;
pub mod metrics;
pub mod report;

pub use evaluator::*;
pub use metrics::*;
pub use report::*;
