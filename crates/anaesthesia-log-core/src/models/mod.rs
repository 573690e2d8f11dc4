//! Domain models for the anaesthesia case log.

mod case_record;
mod field;

pub use case_record::*;
pub use field::*;
