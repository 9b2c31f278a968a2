//! Feature engineering: differences, lags, calendar dummies, trends, and the
//! chronological train/test split.

pub mod plan;
pub mod split;
pub mod table;
pub mod transforms;

pub use plan::*;
pub use split::*;
pub use table::*;
