//! Loading and cleaning of the price file

pub mod cleaner;
pub mod loader;
pub mod table;

pub use cleaner::*;
pub use loader::*;
pub use table::*;
