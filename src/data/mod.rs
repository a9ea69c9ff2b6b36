//! Data module - CSV loading and reshaping

mod loader;
mod processor;

pub use loader::DataLoader;
pub use processor::{DataProcessor, DurationKey, PivotTable, ProcessorError, TYPE_COL};
