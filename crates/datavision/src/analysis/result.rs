//! Result shapes produced by the formula engine.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::registry::Row;
use crate::value::CellValue;

/// One group of a `groupSum`/`groupAvg` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedValue {
    pub name: String,
    pub value: f64,
}

/// One point of a `trend` or `statistics` result. `x` is the raw cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub x: CellValue,
    pub y: f64,
}

/// One entry of a `compare` result. `category` is the raw cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryValue {
    pub category: CellValue,
    pub value: f64,
}

/// One slice of a `distribution` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSlice {
    #[serde(rename = "type")]
    pub label: String,
    pub value: f64,
    /// Share of the column total, 0-100. Zero when the total is not positive.
    pub percent: f64,
}

/// Descriptive statistics over one numeric column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub sum: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub median: f64,
    pub count: usize,
}

/// Output of a formula evaluation.
///
/// Serializes as `{"type": <tag>, "data": <payload>}`, with an extra
/// `"summary"` field for [`CalculationResult::Statistics`].
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationResult {
    Single(f64),
    Grouped(Vec<GroupedValue>),
    Trend(Vec<TrendPoint>),
    Compare(Vec<CategoryValue>),
    Distribution(Vec<DistributionSlice>),
    Statistics {
        data: Vec<TrendPoint>,
        summary: Summary,
    },
    /// Rows passed through untouched (unrecognized formula).
    Raw(Vec<Row>),
}

impl CalculationResult {
    /// Wire tag of this result.
    pub fn kind(&self) -> &'static str {
        match self {
            CalculationResult::Single(_) => "single",
            CalculationResult::Grouped(_) => "grouped",
            CalculationResult::Trend(_) => "trend",
            CalculationResult::Compare(_) => "compare",
            CalculationResult::Distribution(_) => "distribution",
            CalculationResult::Statistics { .. } => "statistics",
            CalculationResult::Raw(_) => "raw",
        }
    }

    /// The summary block, present only for statistics.
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            CalculationResult::Statistics { summary, .. } => Some(summary),
            _ => None,
        }
    }

    /// The scalar of a `single` result.
    pub fn as_single(&self) -> Option<f64> {
        match self {
            CalculationResult::Single(v) => Some(*v),
            _ => None,
        }
    }
}

impl Serialize for CalculationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.summary().is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("CalculationResult", len)?;
        state.serialize_field("type", self.kind())?;

        match self {
            CalculationResult::Single(v) => state.serialize_field("data", v)?,
            CalculationResult::Grouped(data) => state.serialize_field("data", data)?,
            CalculationResult::Trend(data) => state.serialize_field("data", data)?,
            CalculationResult::Compare(data) => state.serialize_field("data", data)?,
            CalculationResult::Distribution(data) => state.serialize_field("data", data)?,
            CalculationResult::Statistics { data, summary } => {
                state.serialize_field("data", data)?;
                state.serialize_field("summary", summary)?;
            }
            CalculationResult::Raw(rows) => state.serialize_field("data", rows)?,
        }

        state.end()
    }
}
