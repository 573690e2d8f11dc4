//! CSV export of the case log.

mod csv;
mod sink;

pub use csv::*;
pub use sink::*;
