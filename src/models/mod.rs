//! Regression specifications for the differenced balancing price and the
//! estimators behind them.

pub mod autoreg;
pub mod fitter;
pub mod ols;
pub mod spec;
pub mod summary;

pub use autoreg::*;
pub use fitter::*;
pub use ols::*;
pub use spec::*;
pub use summary::*;
