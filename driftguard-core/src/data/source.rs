//! Data source abstraction for loading datasets from tabular files.

use super::Dataset;
use crate::error::DriftError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cell spellings read as missing values.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Information about a data source, logged alongside each load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceInfo {
    pub source_type: String,
    pub location: String,
    pub accessed_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for loading a dataset from a source.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Load data from this source, optionally limiting the number of rows.
    async fn load(&self, limit: Option<usize>) -> Result<Dataset, DriftError>;

    /// Return metadata about this source.
    fn source_info(&self) -> DataSourceInfo;
}

/// Pick a source for `path` from its extension.
pub fn source_for_path(path: &Path) -> Result<Box<dyn DataSource>, DriftError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let path = path.to_path_buf();
    match extension.as_str() {
        "csv" => Ok(Box::new(CsvSource {
            path,
            delimiter: ',',
        })),
        "tsv" => Ok(Box::new(CsvSource {
            path,
            delimiter: '\t',
        })),
        "json" => Ok(Box::new(JsonSource { path })),
        "jsonl" | "ndjson" => Ok(Box::new(JsonlSource { path })),
        _ => Err(DriftError::UnsupportedFormat {
            extension: format!(".{extension}"),
        }),
    }
}

/// Load a whole dataset from `path`, failing with `NotFound` when it does not exist.
///
/// An IO error while checking existence is returned as `Io`, not `NotFound`.
pub async fn load_dataset(path: &Path) -> Result<Dataset, DriftError> {
    if !tokio::fs::try_exists(path).await? {
        return Err(DriftError::not_found(path));
    }
    let source = source_for_path(path)?;
    let dataset = source.load(None).await?;
    let info = source.source_info();
    tracing::info!(
        source_type = %info.source_type,
        location = %info.location,
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "Loaded dataset"
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CsvSource
// ---------------------------------------------------------------------------

/// Delimited text file with a header row.
pub struct CsvSource {
    pub path: PathBuf,
    pub delimiter: char,
}

impl CsvSource {
    /// Parse CSV text already in memory.
    pub fn parse(content: &str, delimiter: char, limit: Option<usize>) -> Result<Dataset, DriftError> {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());

        let columns: Vec<String> = split_fields(
            lines
                .next()
                .ok_or_else(|| DriftError::dataset("Empty CSV file"))?,
            delimiter,
        );

        let mut rows = Vec::new();
        for (line_no, line) in lines.enumerate() {
            if limit.is_some_and(|max| rows.len() >= max) {
                break;
            }
            let fields = split_fields(line, delimiter);
            if fields.len() > columns.len() {
                return Err(DriftError::dataset(format!(
                    "Row {} has {} fields, header has {}",
                    line_no + 2,
                    fields.len(),
                    columns.len()
                )));
            }
            rows.push(fields.iter().map(|f| parse_cell(f)).collect());
        }

        Ok(Dataset::new(columns, rows))
    }
}

#[async_trait]
impl DataSource for CsvSource {
    async fn load(&self, limit: Option<usize>) -> Result<Dataset, DriftError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Self::parse(&content, self.delimiter, limit)
    }

    fn source_info(&self) -> DataSourceInfo {
        DataSourceInfo {
            source_type: "csv".to_string(),
            location: self.path.display().to_string(),
            accessed_at: chrono::Utc::now(),
        }
    }
}

/// Split one line on `delimiter`, honoring double-quoted fields and `""` escapes.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Type a raw CSV cell: missing marker, integer, float, boolean or text.
///
/// Non-finite floats (`inf`) have no JSON representation and read as missing.
fn parse_cell(raw: &str) -> serde_json::Value {
    if MISSING_MARKERS.contains(&raw) {
        return serde_json::Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return serde_json::Value::Number(i.into());
    }
    if let Ok(f) = raw.parse::<f64>() {
        return serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
    }
    match raw {
        "true" | "True" | "TRUE" => serde_json::Value::Bool(true),
        "false" | "False" | "FALSE" => serde_json::Value::Bool(false),
        _ => serde_json::Value::String(raw.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JsonSource
// ---------------------------------------------------------------------------

/// JSON file holding an array of records (or a single record).
pub struct JsonSource {
    pub path: PathBuf,
}

#[async_trait]
impl DataSource for JsonSource {
    async fn load(&self, limit: Option<usize>) -> Result<Dataset, DriftError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let items = match value {
            serde_json::Value::Array(arr) => arr,
            obj @ serde_json::Value::Object(_) => vec![obj],
            _ => return Err(DriftError::dataset("JSON must be an array or object")),
        };
        let limited = match limit {
            Some(max) => items.into_iter().take(max).collect(),
            None => items,
        };
        records_to_dataset(&limited)
    }

    fn source_info(&self) -> DataSourceInfo {
        DataSourceInfo {
            source_type: "json".to_string(),
            location: self.path.display().to_string(),
            accessed_at: chrono::Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// JsonlSource
// ---------------------------------------------------------------------------

/// JSON Lines (JSONL) file data source, one JSON object per line.
pub struct JsonlSource {
    pub path: PathBuf,
}

#[async_trait]
impl DataSource for JsonlSource {
    async fn load(&self, limit: Option<usize>) -> Result<Dataset, DriftError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut items = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if limit.is_some_and(|max| items.len() >= max) {
                break;
            }
            let value: serde_json::Value = serde_json::from_str(line)?;
            items.push(value);
        }
        records_to_dataset(&items)
    }

    fn source_info(&self) -> DataSourceInfo {
        DataSourceInfo {
            source_type: "jsonl".to_string(),
            location: self.path.display().to_string(),
            accessed_at: chrono::Utc::now(),
        }
    }
}

/// Build a dataset from JSON objects; columns are the union of keys in first-seen order.
fn records_to_dataset(items: &[serde_json::Value]) -> Result<Dataset, DriftError> {
    let mut columns: Vec<String> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let serde_json::Value::Object(map) = item else {
            return Err(DriftError::dataset(format!("Record {i} is not a JSON object")));
        };
        for key in map.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|col| item.get(col).cloned().unwrap_or(serde_json::Value::Null))
                .collect()
        })
        .collect();

    Ok(Dataset::new(columns, rows))
}
