//! Bulk CSV product import pipeline.
//!
//! Parser, per-row validator, attribute resolver, and the orchestrating
//! service. The write side lives behind [`crate::domain::ports::ImportWriter`].

mod parser;
mod report;
mod resolver;
mod row;
mod service;

pub use parser::{CsvParseError, ParsedRow, parse_csv};
pub use report::{ImportReport, MAX_REPORTED_ERRORS};
pub use resolver::AttributeIndex;
pub use row::{DEFAULT_PLANT_SIZE, RowError, ValidatedRow, VariantSpec, validate_row};
pub use service::ImportService;
