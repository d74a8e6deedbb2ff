//! Export parser for Tridium Niagara diagnostic files
//!
//! This module turns raw file bytes into a normalized [`TridiumDataset`]:
//! tokenizing quoted-CSV exports and free-text platform reports, detecting
//! which known format the header set carries, classifying columns, and
//! decoding compound status flags and unit-suffixed values per row.
//!
//! ## Architecture
//!
//! - [`tokenizer`] - CSV line splitting and platform-report section scanning
//! - [`format`] - Header-set format detection with exact and fuzzy passes
//! - [`columns`] - Semantic column classification by name heuristics
//! - [`status`] - Compound bracketed status token decoding
//! - [`values`] - Unit-suffixed and compound value decoding
//! - [`parser`] - Orchestration from bytes to dataset
//! - [`stats`] - Row-level error/warning accumulation
//!
//! ## Usage
//!
//! ```rust
//! use niagara_processor::app::services::export_parser::ExportParser;
//! use niagara_processor::config::PipelineConfig;
//!
//! # fn example() -> niagara_processor::Result<()> {
//! let parser = ExportParser::new(PipelineConfig::default());
//! let content = "Name,Value\ncpu.usage,12%\n";
//! let outcome = parser.parse(content, "resources.csv", None)?;
//!
//! println!("Parsed {} rows as {}", outcome.dataset.row_count(), outcome.dataset.format);
//! # Ok(())
//! # }
//! ```

pub mod columns;
pub mod format;
pub mod parser;
pub mod stats;
pub mod status;
pub mod tokenizer;
pub mod values;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use columns::ColumnKind;
pub use format::{FormatMatch, FormatSpec, FORMAT_SPECS};
pub use parser::ExportParser;
pub use stats::{ParseOutcome, ParseStats};
pub use status::decode_status;
pub use tokenizer::RawTable;
pub use values::ValueDecoder;

#[allow(unused_imports)]
use crate::app::models::TridiumDataset;
