//! Side-by-side totals across several datasets.

use serde::{Deserialize, Serialize};

use super::cell;
use crate::registry::{Dataset, Registry};
use crate::value::{as_number, CellValue};

/// One labelled value of a compared dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: CellValue,
    pub value: f64,
}

/// Per-dataset comparison entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetComparison {
    pub dataset_id: String,
    pub file_name: String,
    pub total: f64,
    pub row_count: usize,
    pub data: Vec<LabeledValue>,
}

/// Compare datasets by their `value_column` totals.
///
/// Unknown ids are skipped. Results follow the order of `dataset_ids`,
/// duplicates included.
pub fn compare<S: AsRef<str>>(
    registry: &Registry,
    dataset_ids: &[S],
    value_column: &str,
    label_column: &str,
) -> Vec<DatasetComparison> {
    dataset_ids
        .iter()
        .filter_map(|id| {
            let id = id.as_ref();
            registry
                .get(id)
                .ok()
                .map(|dataset| compare_dataset(id, &dataset, value_column, label_column))
        })
        .collect()
}

/// Project one dataset to labelled values and total them.
pub fn compare_dataset(
    id: &str,
    dataset: &Dataset,
    value_column: &str,
    label_column: &str,
) -> DatasetComparison {
    let data: Vec<LabeledValue> = dataset
        .rows
        .iter()
        .map(|row| LabeledValue {
            label: cell(row, label_column).clone(),
            value: as_number(cell(row, value_column)),
        })
        .collect();
    let total = data.iter().map(|d| d.value).sum();

    DatasetComparison {
        dataset_id: id.to_string(),
        file_name: dataset.file_name.clone(),
        total,
        row_count: dataset.rows.len(),
        data,
    }
}
