//! Tabular datasets: loading from disk and numeric column selection.

pub mod schema;
pub mod source;

pub use schema::{ColumnSchema, ColumnType, SchemaDefinition, infer_schema};
pub use source::{
    CsvSource, DataSource, DataSourceInfo, JsonSource, JsonlSource, load_dataset, source_for_path,
};

use crate::drift::Sample;
use serde::{Deserialize, Serialize};

/// A loaded table: ordered column names plus row-major cell values.
///
/// Missing cells are `Value::Null`; short rows are padded implicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The column as a numeric sample. Non-numeric and missing cells are dropped.
    pub fn sample(&self, name: &str) -> Option<Sample> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(serde_json::Value::as_f64))
                .collect(),
        )
    }

    pub fn schema(&self) -> SchemaDefinition {
        infer_schema(&self.columns, &self.rows)
    }

    /// Names of numeric columns, in column order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.schema()
            .columns
            .into_iter()
            .filter(|c| c.dtype.is_numeric())
            .map(|c| c.name)
            .collect()
    }
}

/// Columns numeric in `reference` that are also numeric in `current`, in reference order.
pub fn common_numeric_columns(reference: &Dataset, current: &Dataset) -> Vec<String> {
    let current_numeric = current.numeric_columns();
    reference
        .numeric_columns()
        .into_iter()
        .filter(|c| current_numeric.contains(c))
        .collect()
}
