//! Domain types: bars and validated series.

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{Series, SeriesError};
