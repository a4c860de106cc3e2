//! Schema definition and type inference for datasets.

use serde::{Deserialize, Serialize};

/// Column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Boolean,
    Json,
    /// Every cell is missing.
    Null,
}

impl ColumnType {
    /// Whether drift metrics apply to this column.
    ///
    /// An all-missing column counts as numeric (a float column of NaNs); its
    /// metrics come out undefined.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Null)
    }
}

/// Schema definition for a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub columns: Vec<ColumnSchema>,
}

/// Schema for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub dtype: ColumnType,
    pub nullable: bool,
}

/// Infer column type from its values. Any text makes the column a string column.
pub fn infer_column_type<'a, I>(values: I) -> ColumnType
where
    I: IntoIterator<Item = &'a serde_json::Value>,
{
    let mut has_int = false;
    let mut has_float = false;
    let mut has_bool = false;
    let mut has_string = false;
    let mut has_nested = false;

    for v in values {
        match v {
            serde_json::Value::Number(n) => {
                if n.is_f64() {
                    has_float = true;
                } else {
                    has_int = true;
                }
            }
            serde_json::Value::Bool(_) => has_bool = true,
            serde_json::Value::String(_) => has_string = true,
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => has_nested = true,
            serde_json::Value::Null => {}
        }
    }

    if has_string {
        return ColumnType::String;
    }
    if has_nested {
        return ColumnType::Json;
    }
    if has_bool {
        return ColumnType::Boolean;
    }
    if has_float {
        return ColumnType::Float;
    }
    if has_int {
        return ColumnType::Integer;
    }
    ColumnType::Null
}

/// Infer schema from column names and row-major values.
pub fn infer_schema(columns: &[String], rows: &[Vec<serde_json::Value>]) -> SchemaDefinition {
    let columns = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            ColumnSchema {
                name: name.clone(),
                dtype: infer_column_type(rows.iter().filter_map(|row| row.get(i))),
                nullable: rows.iter().any(|row| row.get(i).is_none_or(|v| v.is_null())),
            }
        })
        .collect();

    SchemaDefinition { columns }
}
