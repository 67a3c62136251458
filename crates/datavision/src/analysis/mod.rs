//! Analytical queries over stored rows: formulas, period rollups, comparison.
//!
//! All functions here are pure and operate on row snapshots; none of them
//! touch the registry lock except [`compare`], which only reads.

mod compare;
mod formula;
mod period;
mod result;

pub use compare::{compare, compare_dataset, DatasetComparison, LabeledValue};
pub use formula::{evaluate, summarize, Formula};
pub use period::{
    aggregate, parse_date, parse_date_cell, Period, PeriodAggregator, PeriodConfig, PeriodValue,
};
pub use result::{
    CalculationResult, CategoryValue, DistributionSlice, GroupedValue, Summary, TrendPoint,
};

use crate::registry::Row;
use crate::value::CellValue;

static ABSENT: CellValue = CellValue::Absent;

/// Cell of `row` under `column`, absent if the row lacks it.
pub(crate) fn cell<'a>(row: &'a Row, column: &str) -> &'a CellValue {
    row.get(column).unwrap_or(&ABSENT)
}
