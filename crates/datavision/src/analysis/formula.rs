//! Formula dispatch: aggregate, group and project a dataset's rows.
//!
//! Every formula degrades to zero/empty output on missing or non-numeric
//! data; evaluation never fails.

use std::fmt;

use indexmap::IndexMap;

use super::cell;
use super::result::{
    CalculationResult, CategoryValue, DistributionSlice, GroupedValue, Summary, TrendPoint,
};
use crate::registry::Row;
use crate::value::{as_number, as_text};

/// A named aggregation/transformation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formula {
    Sum,
    Average,
    Max,
    Min,
    GroupSum,
    GroupAvg,
    Trend,
    Compare,
    Distribution,
    Statistics,
    /// Any unrecognized name: rows are returned as-is.
    Raw,
}

impl Formula {
    /// All recognized formulas.
    pub const ALL: [Formula; 10] = [
        Formula::Sum,
        Formula::Average,
        Formula::Max,
        Formula::Min,
        Formula::GroupSum,
        Formula::GroupAvg,
        Formula::Trend,
        Formula::Compare,
        Formula::Distribution,
        Formula::Statistics,
    ];

    /// Resolve a formula by its exact name. Unknown names map to [`Formula::Raw`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "sum" => Formula::Sum,
            "average" => Formula::Average,
            "max" => Formula::Max,
            "min" => Formula::Min,
            "groupSum" => Formula::GroupSum,
            "groupAvg" => Formula::GroupAvg,
            "trend" => Formula::Trend,
            "compare" => Formula::Compare,
            "distribution" => Formula::Distribution,
            "statistics" => Formula::Statistics,
            _ => Formula::Raw,
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Formula::Sum => "sum",
            Formula::Average => "average",
            Formula::Max => "max",
            Formula::Min => "min",
            Formula::GroupSum => "groupSum",
            Formula::GroupAvg => "groupAvg",
            Formula::Trend => "trend",
            Formula::Compare => "compare",
            Formula::Distribution => "distribution",
            Formula::Statistics => "statistics",
            Formula::Raw => "raw",
        }
    }
}

impl From<&str> for Formula {
    fn from(name: &str) -> Self {
        Formula::from_name(name)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluate `formula` over `rows`, reading labels from `column_x` and values
/// from `column_y`.
pub fn evaluate(
    rows: &[Row],
    formula: Formula,
    column_x: &str,
    column_y: &str,
) -> CalculationResult {
    // Scalar reductions only see rows that carry the Y column
    let y_values: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.get(column_y).map(as_number))
        .collect();

    match formula {
        Formula::Sum => CalculationResult::Single(y_values.iter().sum()),
        Formula::Average => CalculationResult::Single(mean(&y_values)),
        Formula::Max => CalculationResult::Single(
            y_values.iter().copied().reduce(f64::max).unwrap_or(0.0),
        ),
        Formula::Min => CalculationResult::Single(
            y_values.iter().copied().reduce(f64::min).unwrap_or(0.0),
        ),
        Formula::GroupSum => CalculationResult::Grouped(
            group(rows, column_x, column_y)
                .into_iter()
                .map(|(name, (sum, _))| GroupedValue { name, value: sum })
                .collect(),
        ),
        Formula::GroupAvg => CalculationResult::Grouped(
            group(rows, column_x, column_y)
                .into_iter()
                .map(|(name, (sum, count))| GroupedValue {
                    name,
                    value: sum / count as f64,
                })
                .collect(),
        ),
        Formula::Trend => CalculationResult::Trend(trend(rows, column_x, column_y)),
        Formula::Compare => CalculationResult::Compare(
            rows.iter()
                .map(|row| CategoryValue {
                    category: cell(row, column_x).clone(),
                    value: as_number(cell(row, column_y)),
                })
                .collect(),
        ),
        Formula::Distribution => {
            let total: f64 = y_values.iter().sum();
            CalculationResult::Distribution(
                rows.iter()
                    .map(|row| {
                        let value = as_number(cell(row, column_y));
                        let percent = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                        DistributionSlice {
                            label: as_text(cell(row, column_x)),
                            value,
                            percent,
                        }
                    })
                    .collect(),
            )
        }
        Formula::Statistics => {
            if y_values.is_empty() {
                return CalculationResult::Statistics {
                    data: Vec::new(),
                    summary: Summary::default(),
                };
            }
            CalculationResult::Statistics {
                data: trend(rows, column_x, column_y),
                summary: summarize(&y_values),
            }
        }
        Formula::Raw => CalculationResult::Raw(rows.to_vec()),
    }
}

/// Compute a [`Summary`] over a set of values. All zeros when empty.
pub fn summarize(values: &[f64]) -> Summary {
    if values.is_empty() {
        return Summary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let sum: f64 = values.iter().sum();

    Summary {
        sum,
        average: sum / n as f64,
        max: sorted[n - 1],
        min: sorted[0],
        median,
        count: n,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn trend(rows: &[Row], column_x: &str, column_y: &str) -> Vec<TrendPoint> {
    rows.iter()
        .map(|row| TrendPoint {
            x: cell(row, column_x).clone(),
            y: as_number(cell(row, column_y)),
        })
        .collect()
}

/// Per-label (sum, count), in first-seen label order.
fn group(rows: &[Row], column_x: &str, column_y: &str) -> IndexMap<String, (f64, usize)> {
    let mut groups: IndexMap<String, (f64, usize)> = IndexMap::new();
    for row in rows {
        let entry = groups.entry(as_text(cell(row, column_x))).or_insert((0.0, 0));
        entry.0 += as_number(cell(row, column_y));
        entry.1 += 1;
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DecodedTable;
    use crate::value::CellValue;

    fn sales_rows() -> Vec<Row> {
        DecodedTable::from_records(
            ["region", "sales"],
            vec![vec!["A", "10"], vec!["B", "20"], vec!["A", "5"]],
        )
        .rows
    }

    fn single(rows: &[Row], formula: Formula) -> f64 {
        evaluate(rows, formula, "region", "sales")
            .as_single()
            .expect("single result")
    }

    #[test]
    fn test_scalar_formulas() {
        let rows = sales_rows();
        assert_eq!(single(&rows, Formula::Sum), 35.0);
        assert!((single(&rows, Formula::Average) - 35.0 / 3.0).abs() < 1e-12);
        assert_eq!(single(&rows, Formula::Max), 20.0);
        assert_eq!(single(&rows, Formula::Min), 5.0);
    }

    #[test]
    fn test_scalar_formulas_on_empty_input() {
        for formula in [Formula::Sum, Formula::Average, Formula::Max, Formula::Min] {
            assert_eq!(single(&[], formula), 0.0, "{}", formula);
        }
    }

    #[test]
    fn test_missing_column_counts_nothing() {
        let rows = sales_rows();
        let result = evaluate(&rows, Formula::Average, "region", "profit");
        assert_eq!(result.as_single(), Some(0.0));
    }

    #[test]
    fn test_group_sum() {
        let rows = sales_rows();
        let CalculationResult::Grouped(groups) = evaluate(&rows, Formula::GroupSum, "region", "sales")
        else {
            panic!("expected grouped result");
        };

        assert_eq!(groups.len(), 2);
        let a = groups.iter().find(|g| g.name == "A").unwrap();
        let b = groups.iter().find(|g| g.name == "B").unwrap();
        assert_eq!(a.value, 15.0);
        assert_eq!(b.value, 20.0);
    }

    #[test]
    fn test_group_avg() {
        let rows = sales_rows();
        let CalculationResult::Grouped(groups) = evaluate(&rows, Formula::GroupAvg, "region", "sales")
        else {
            panic!("expected grouped result");
        };

        let a = groups.iter().find(|g| g.name == "A").unwrap();
        assert_eq!(a.value, 7.5);
    }

    #[test]
    fn test_group_by_numeric_label() {
        let rows = DecodedTable::from_records(
            ["year", "v"],
            vec![vec!["2023", "1"], vec!["2023.0", "2"], vec!["2024", "3"]],
        )
        .rows;
        let CalculationResult::Grouped(groups) = evaluate(&rows, Formula::GroupSum, "year", "v")
        else {
            panic!("expected grouped result");
        };

        let y2023 = groups.iter().find(|g| g.name == "2023").unwrap();
        assert_eq!(y2023.value, 3.0);
    }

    #[test]
    fn test_trend_keeps_raw_x_and_order() {
        let rows = sales_rows();
        let CalculationResult::Trend(points) = evaluate(&rows, Formula::Trend, "region", "sales")
        else {
            panic!("expected trend result");
        };

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].x, CellValue::Text("A".into()));
        assert_eq!(points[1].y, 20.0);
        assert_eq!(points[2].y, 5.0);
    }

    #[test]
    fn test_compare_missing_x_is_absent() {
        let rows = sales_rows();
        let CalculationResult::Compare(entries) = evaluate(&rows, Formula::Compare, "nope", "sales")
        else {
            panic!("expected compare result");
        };

        assert!(entries.iter().all(|e| e.category == CellValue::Absent));
        assert_eq!(entries[2].value, 5.0);
    }

    #[test]
    fn test_distribution_percentages() {
        let rows = sales_rows();
        let CalculationResult::Distribution(slices) =
            evaluate(&rows, Formula::Distribution, "region", "sales")
        else {
            panic!("expected distribution result");
        };

        let total: f64 = slices.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!((slices[1].percent - 20.0 / 35.0 * 100.0).abs() < 1e-9);
        assert_eq!(slices[0].label, "A");
    }

    #[test]
    fn test_distribution_zero_total() {
        let rows = DecodedTable::from_records(["k", "v"], vec![vec!["a", "x"], vec!["b", "0"]]).rows;
        let CalculationResult::Distribution(slices) = evaluate(&rows, Formula::Distribution, "k", "v")
        else {
            panic!("expected distribution result");
        };

        assert!(slices.iter().all(|s| s.percent == 0.0));
    }

    #[test]
    fn test_statistics() {
        let rows = DecodedTable::from_records(
            ["t", "v"],
            vec![vec!["a", "4"], vec!["b", "1"], vec!["c", "3"], vec!["d", "2"]],
        )
        .rows;
        let result = evaluate(&rows, Formula::Statistics, "t", "v");
        let summary = result.summary().unwrap();

        assert_eq!(summary.sum, 10.0);
        assert_eq!(summary.average, 2.5);
        assert_eq!(summary.max, 4.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.count, 4);

        let CalculationResult::Statistics { data, .. } = result else {
            unreachable!();
        };
        assert_eq!(data[0].y, 4.0);
    }

    #[test]
    fn test_statistics_empty() {
        let result = evaluate(&[], Formula::Statistics, "x", "y");
        assert_eq!(
            result,
            CalculationResult::Statistics {
                data: Vec::new(),
                summary: Summary::default(),
            }
        );
    }

    #[test]
    fn test_median_single_value() {
        assert_eq!(summarize(&[5.0]).median, 5.0);
        assert_eq!(summarize(&[1.0, 2.0, 3.0, 4.0]).median, 2.5);
    }

    #[test]
    fn test_unrecognized_formula_returns_rows() {
        let rows = sales_rows();
        let result = evaluate(&rows, Formula::from_name("percentile"), "region", "sales");
        assert_eq!(result, CalculationResult::Raw(rows));
    }

    #[test]
    fn test_formula_names_round_trip() {
        for formula in Formula::ALL {
            assert_eq!(Formula::from_name(formula.name()), formula);
        }
        assert_eq!(Formula::from_name("SUM"), Formula::Raw);
    }
}
