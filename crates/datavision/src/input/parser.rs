//! CSV/TSV and spreadsheet decoding with delimiter detection.

use std::fs;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDateTime, Timelike};
use log::{debug, warn};
use sha2::{Digest, Sha256};

use super::source::{DecodedTable, SourceInfo};
use crate::error::{DataVisionError, Result};
use crate::registry::Row;
use crate::value::CellValue;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Turns an uploaded byte stream into a decoded table.
///
/// The file name is only consulted for its extension.
pub trait Decoder: Send + Sync {
    /// Decode `bytes` that were uploaded under `file_name`.
    fn decode(&self, bytes: &[u8], file_name: &str) -> Result<DecodedTable>;
}

/// Container format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimiter-separated text (csv, tsv, txt).
    Delimited,
    /// Spreadsheet workbook (xlsx, xlsm, xlsb, xls, ods).
    Workbook,
}

impl FileFormat {
    /// Pick the format from a file name's extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()?
            .to_string_lossy()
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" | "tsv" | "txt" => Some(FileFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(FileFormat::Workbook),
            _ => None,
        }
    }
}

/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Delimiter to use for text files (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character for text files.
    pub quote: u8,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
        }
    }
}

/// Decodes CSV/TSV through `csv` and workbooks through `calamine`.
#[derive(Debug, Clone, Default)]
pub struct FileDecoder {
    config: DecoderConfig,
}

impl FileDecoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with custom configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Read and decode a file from disk.
    pub fn decode_path(&self, path: impl AsRef<Path>) -> Result<DecodedTable> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| DataVisionError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.decode(&contents, &file_name)
    }

    /// Parse delimited text into headers and typed rows.
    fn parse_delimited(&self, bytes: &[u8], delimiter: u8) -> Result<(Vec<String>, Vec<Row>)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.is_empty() {
            return Err(DataVisionError::EmptyData("No header row found".to_string()));
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable record {}: {}", row_idx + 1, e);
                    continue;
                }
            };

            if record.len() != headers.len() {
                warn!(
                    "Skipping record {}: expected {} fields, found {}",
                    row_idx + 1,
                    headers.len(),
                    record.len()
                );
                continue;
            }

            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(h, raw)| (h.clone(), CellValue::from_raw(raw)))
                .collect();
            rows.push(row);
        }

        Ok((headers, rows))
    }

    /// Parse the first sheet of a workbook into headers and typed rows.
    fn parse_workbook(&self, bytes: &[u8]) -> Result<(Vec<String>, Vec<Row>)> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DataVisionError::EmptyData("Workbook contains no sheets".to_string()))??;

        let mut sheet_rows = range.rows();
        let headers: Vec<String> = match sheet_rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| workbook_cell(cell).map(|v| v.as_text()).unwrap_or_default())
                .collect(),
            None => return Err(DataVisionError::EmptyData("No header row found".to_string())),
        };

        let mut rows = Vec::new();
        for sheet_row in sheet_rows {
            let row: Row = headers
                .iter()
                .zip(sheet_row.iter())
                .filter_map(|(h, cell)| workbook_cell(cell).map(|v| (h.clone(), v)))
                .collect();

            // Blank spreadsheet rows carry no data
            if row.is_empty() {
                continue;
            }
            rows.push(row);
        }

        Ok((headers, rows))
    }
}

impl Decoder for FileDecoder {
    fn decode(&self, bytes: &[u8], file_name: &str) -> Result<DecodedTable> {
        let format = FileFormat::from_file_name(file_name).ok_or_else(|| {
            DataVisionError::UnsupportedFormat(format!(
                "{} (expected csv, tsv, xlsx, xls or ods)",
                file_name
            ))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (headers, rows, format_name) = match format {
            FileFormat::Delimited => {
                let delimiter = match self.config.delimiter {
                    Some(d) => d,
                    None => detect_delimiter(bytes)?,
                };
                let (headers, rows) = self.parse_delimited(bytes, delimiter)?;
                let name = match delimiter {
                    b'\t' => "tsv",
                    b',' => "csv",
                    b';' => "csv-semicolon",
                    b'|' => "psv",
                    _ => "delimited",
                };
                (headers, rows, name.to_string())
            }
            FileFormat::Workbook => {
                let (headers, rows) = self.parse_workbook(bytes)?;
                let ext = Path::new(file_name)
                    .extension()
                    .map(|e| e.to_string_lossy().to_ascii_lowercase())
                    .unwrap_or_default();
                (headers, rows, ext)
            }
        };

        debug!(
            "Decoded {} as {}: {} columns, {} rows",
            file_name,
            format_name,
            headers.len(),
            rows.len()
        );

        Ok(DecodedTable::new(headers, rows).with_source(SourceInfo {
            format: format_name,
            size_bytes: bytes.len() as u64,
            hash,
        }))
    }
}

/// Type one spreadsheet cell. `None` means the cell is empty.
fn workbook_cell(cell: &Data) -> Option<CellValue> {
    let value = match cell {
        Data::Empty => return None,
        Data::String(s) => CellValue::from_raw(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::Text(format_sheet_datetime(naive)),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    };
    Some(value)
}

/// Render a spreadsheet date in one of the formats the period parser accepts.
fn format_sheet_datetime(value: NaiveDateTime) -> String {
    if value.num_seconds_from_midnight() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(DataVisionError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts across lines beat a higher but ragged count
        let score = if counts.iter().all(|&c| c == first_count) {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
