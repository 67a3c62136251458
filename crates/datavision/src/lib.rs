//! Data Vision: in-memory dataset registry and analytical query engine.
//!
//! Uploaded tables (CSV/TSV/spreadsheets) are decoded once, typed cell by
//! cell, and kept in a concurrent registry for the life of the process.
//! Queries then run against snapshots of the stored rows.
//!
//! # Core Principles
//!
//! - **Never fail a query**: non-numeric or missing cells degrade to `0` or `""`
//! - **Immutable datasets**: the registry only adds or removes whole datasets
//! - **Snapshot reads**: analysis never holds the registry lock
//!
//! # Example
//!
//! ```
//! use datavision::{DataVision, Formula, Period};
//!
//! let service = DataVision::new();
//! let (id, _) = service
//!     .upload(b"date,region,sales\n2023-01-02,A,10\n2023-01-20,B,5\n", "sales.csv")
//!     .unwrap();
//!
//! let total = service.evaluate_formula(&id, Formula::Sum, "region", "sales").unwrap();
//! assert_eq!(total.as_single(), Some(15.0));
//!
//! let months = service.aggregate_period(&id, "date", "sales", Period::Month).unwrap();
//! assert_eq!(months[0].period, "2023-01");
//! ```

pub mod analysis;
pub mod error;
pub mod input;
pub mod registry;
pub mod value;

mod datavision;

pub use crate::datavision::{DataVision, DataVisionConfig};
pub use analysis::{
    CalculationResult, DatasetComparison, Formula, Period, PeriodAggregator, PeriodConfig,
    PeriodValue, Summary,
};
pub use error::{DataVisionError, Result};
pub use input::{DecodedTable, Decoder, DecoderConfig, FileDecoder, SourceInfo};
pub use registry::{Dataset, DatasetId, DatasetSummary, Registry, Row};
pub use value::{as_number, as_text, CellValue};
