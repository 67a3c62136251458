//! Main DataVision struct and public API.

use std::sync::Arc;

use log::{debug, info};

use crate::analysis::{
    self, CalculationResult, DatasetComparison, Formula, Period, PeriodAggregator, PeriodConfig,
    PeriodValue,
};
use crate::error::Result;
use crate::input::{DecodedTable, Decoder, DecoderConfig, FileDecoder};
use crate::registry::{Dataset, DatasetId, DatasetSummary, Registry};

/// Configuration for a DataVision service.
#[derive(Debug, Clone, Default)]
pub struct DataVisionConfig {
    /// Decoder configuration for uploads.
    pub decoder: DecoderConfig,
    /// Week bucketing policy for period rollups.
    pub period: PeriodConfig,
}

/// Dataset registry plus the query operations that run against it.
///
/// One instance is built at startup and shared (usually behind an `Arc`)
/// with every request handler.
pub struct DataVision {
    registry: Registry,
    decoder: Arc<dyn Decoder>,
    aggregator: PeriodAggregator,
}

impl DataVision {
    /// Create a service with default configuration.
    pub fn new() -> Self {
        Self::with_config(DataVisionConfig::default())
    }

    /// Create a service with custom configuration.
    pub fn with_config(config: DataVisionConfig) -> Self {
        Self {
            registry: Registry::new(),
            decoder: Arc::new(FileDecoder::with_config(config.decoder)),
            aggregator: PeriodAggregator::with_config(config.period),
        }
    }

    /// Replace the upload decoder.
    pub fn with_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Decode uploaded bytes and register the result.
    ///
    /// Decoding finishes before the registry is touched; a decode failure
    /// leaves the registry unchanged.
    pub fn upload(&self, bytes: &[u8], file_name: &str) -> Result<(DatasetId, Arc<Dataset>)> {
        let table = self.decoder.decode(bytes, file_name)?;
        Ok(self.register(table, file_name))
    }

    /// Register an already-decoded table.
    pub fn ingest(&self, table: DecodedTable, file_name: &str) -> DatasetId {
        self.register(table, file_name).0
    }

    fn register(&self, table: DecodedTable, file_name: &str) -> (DatasetId, Arc<Dataset>) {
        let (id, dataset) = self.registry.insert(Dataset::from_table(table, file_name));
        info!("Ingested {} as dataset {}", file_name, id);
        (id, dataset)
    }

    /// Summaries of all datasets.
    pub fn list_datasets(&self) -> Vec<DatasetSummary> {
        self.registry.list()
    }

    /// Fetch a dataset.
    pub fn get_dataset(&self, id: &str) -> Result<Arc<Dataset>> {
        self.registry.get(id)
    }

    /// Remove a dataset. Returns whether it existed.
    pub fn delete_dataset(&self, id: &str) -> bool {
        self.registry.delete(id)
    }

    /// Run a formula against one dataset.
    pub fn evaluate_formula(
        &self,
        id: &str,
        formula: Formula,
        column_x: &str,
        column_y: &str,
    ) -> Result<CalculationResult> {
        let dataset = self.registry.get(id)?;
        debug!(
            "Evaluating {} on dataset {} (x={}, y={})",
            formula, id, column_x, column_y
        );
        Ok(analysis::evaluate(&dataset.rows, formula, column_x, column_y))
    }

    /// Roll one dataset up into date buckets.
    pub fn aggregate_period(
        &self,
        id: &str,
        date_column: &str,
        value_column: &str,
        period: Period,
    ) -> Result<Vec<PeriodValue>> {
        let dataset = self.registry.get(id)?;
        debug!(
            "Aggregating dataset {} by {:?} (date={}, value={})",
            id, period, date_column, value_column
        );
        Ok(self
            .aggregator
            .aggregate(&dataset.rows, date_column, value_column, period))
    }

    /// Compare totals across datasets; unknown ids are skipped.
    pub fn compare_datasets<S: AsRef<str>>(
        &self,
        ids: &[S],
        value_column: &str,
        label_column: &str,
    ) -> Vec<DatasetComparison> {
        debug!("Comparing {} datasets on {}", ids.len(), value_column);
        analysis::compare(&self.registry, ids, value_column, label_column)
    }
}

impl Default for DataVision {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataVisionError;

    struct FailingDecoder;

    impl Decoder for FailingDecoder {
        fn decode(&self, _bytes: &[u8], file_name: &str) -> Result<DecodedTable> {
            Err(DataVisionError::UnsupportedFormat(file_name.to_string()))
        }
    }

    #[test]
    fn test_upload_and_query() {
        let service = DataVision::new();
        let (id, dataset) = service
            .upload(b"region,sales\nA,10\nB,20\nA,5\n", "sales.csv")
            .unwrap();

        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.file_name, "sales.csv");

        let result = service
            .evaluate_formula(&id, Formula::Sum, "region", "sales")
            .unwrap();
        assert_eq!(result.as_single(), Some(35.0));
    }

    #[test]
    fn test_upload_succeeds_while_datasets_are_deleted() {
        let service = Arc::new(DataVision::new());
        let done = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let deleter = {
            let service = Arc::clone(&service);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                while !done.load(std::sync::atomic::Ordering::SeqCst) {
                    for summary in service.list_datasets() {
                        service.delete_dataset(&summary.id);
                    }
                }
            })
        };

        for i in 0..200 {
            let (_, dataset) = service
                .upload(b"a\n1\n", &format!("{}.csv", i))
                .unwrap();
            assert_eq!(dataset.file_name, format!("{}.csv", i));
        }

        done.store(true, std::sync::atomic::Ordering::SeqCst);
        deleter.join().unwrap();
    }

    #[test]
    fn test_decode_failure_leaves_registry_untouched() {
        let service = DataVision::new().with_decoder(FailingDecoder);
        let err = service.upload(b"a\n1\n", "a.csv").unwrap_err();

        assert!(err.is_decode_failure());
        assert!(service.list_datasets().is_empty());
    }

    #[test]
    fn test_queries_on_unknown_dataset() {
        let service = DataVision::new();
        assert!(matches!(
            service.evaluate_formula("1", Formula::Sum, "x", "y"),
            Err(DataVisionError::NotFound(_))
        ));
        assert!(matches!(
            service.aggregate_period("1", "d", "v", Period::Day),
            Err(DataVisionError::NotFound(_))
        ));
        assert!(service.compare_datasets(&["1"], "v", "l").is_empty());
    }

    #[test]
    fn test_configured_week_start() {
        let service = DataVision::with_config(DataVisionConfig {
            period: PeriodConfig {
                week_start: chrono::Weekday::Mon,
                week_marker: String::new(),
            },
            ..Default::default()
        });
        let id = service.ingest(
            DecodedTable::from_records(["d", "v"], vec![vec!["2023-01-04", "2"]]),
            "w.csv",
        );

        let data = service.aggregate_period(&id, "d", "v", Period::Week).unwrap();
        assert_eq!(data[0].period, "2023-01-02");
    }
}
