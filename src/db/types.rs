//! Decoding engine rows into [`Value`]s.
//!
//! Type conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies column types into logical categories
//! 2. Engine-specific decoders handle the actual value extraction
//!
//! SQLite is dynamically typed, so its decoder looks at each value's
//! storage class and uses the declared type only as a hint.

use crate::db::Engine;
use crate::db::Value;
use crate::db::row::ColumnType;
use crate::error::{DbError, DbResult};
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlRow, MySqlTypeInfo, MySqlValueRef};
use sqlx::postgres::{PgRow, PgTypeInfo};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Decode, Row, Type, TypeInfo, ValueRef};

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Temporal,
    Binary,
    Json,
    Uuid,
    Unknown,
}

/// Classify a database type name into a logical category.
pub fn categorize_type(type_name: &str, engine: Engine) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // Arrays are decoded element-wise by the engine decoders
    if lower.ends_with("[]") {
        return TypeCategory::Unknown;
    }

    // Decimal/Numeric - check first as it overlaps with "numeric" in float checks
    if lower.contains("decimal") || lower.contains("numeric") {
        // SQLite's NUMERIC is actually a float
        if engine == Engine::Sqlite && lower == "numeric" {
            return TypeCategory::Float;
        }
        return TypeCategory::Decimal;
    }

    if lower.contains("timestamp") || lower.contains("date") || lower == "time" {
        return TypeCategory::Temporal;
    }

    // "interval" and "point" contain "int"
    if lower == "interval" || lower == "point" {
        return TypeCategory::Unknown;
    }

    if lower.contains("int") || lower.contains("serial") || lower.contains("tiny") || lower == "year"
    {
        return TypeCategory::Integer;
    }

    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }

    if lower.contains("float")
        || lower.contains("double")
        || lower == "real"
        || lower == "float4"
        || lower == "float8"
    {
        return TypeCategory::Float;
    }

    if lower == "json" || lower == "jsonb" {
        return TypeCategory::Json;
    }

    if lower == "uuid" {
        return TypeCategory::Uuid;
    }

    if lower.contains("blob") || lower.contains("binary") || lower == "bytea" {
        return TypeCategory::Binary;
    }

    // Text and everything else (varchar, char, enum, ...)
    TypeCategory::Unknown
}

// =============================================================================
// Decimal Type Support
// =============================================================================

/// MySQL DECIMAL kept in its exact text form.
///
/// MySQL sends DECIMAL as text in both protocols, so no precision is lost.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::MySql> for RawDecimal {
    fn type_info() -> MySqlTypeInfo {
        <String as Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("decimal") || name.contains("numeric")
    }
}

impl<'r> Decode<'r, sqlx::MySql> for RawDecimal {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::MySql>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

// =============================================================================
// Row Conversion Trait
// =============================================================================

/// Converts engine rows into column metadata and dynamic values.
///
/// A cell that is not NULL but cannot be decoded fails the whole row with
/// [`DbError::Decode`].
pub trait RowToValues {
    fn column_types(&self) -> Vec<ColumnType>;
    fn to_values(&self) -> DbResult<Vec<Value>>;
}

pub(crate) fn column_type_of<C: Column>(col: &C) -> ColumnType {
    ColumnType::new(col.name(), col.type_info().name(), col.ordinal())
}

impl RowToValues for MySqlRow {
    fn column_types(&self) -> Vec<ColumnType> {
        self.columns().iter().map(column_type_of).collect()
    }

    fn to_values(&self) -> DbResult<Vec<Value>> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let type_name = col.type_info().name();
                let category = categorize_type(type_name, Engine::MySql);
                mysql::decode_column(self, idx, type_name, category)
            })
            .collect()
    }
}

impl RowToValues for PgRow {
    fn column_types(&self) -> Vec<ColumnType> {
        self.columns().iter().map(column_type_of).collect()
    }

    fn to_values(&self) -> DbResult<Vec<Value>> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| postgres::decode_column(self, idx, col.type_info()))
            .collect()
    }
}

impl RowToValues for SqliteRow {
    fn column_types(&self) -> Vec<ColumnType> {
        self.columns().iter().map(column_type_of).collect()
    }

    fn to_values(&self) -> DbResult<Vec<Value>> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let category = categorize_type(col.type_info().name(), Engine::Sqlite);
                sqlite::decode_column(self, idx, category)
            })
            .collect()
    }
}

fn decode_failed(type_name: &str, idx: usize, err: impl std::fmt::Display) -> DbError {
    DbError::decode(format!("column {idx} ({type_name}): {err}"))
}

// =============================================================================
// Engine-Specific Decoders
// =============================================================================

mod mysql {
    use super::*;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

    pub fn decode_column(
        row: &MySqlRow,
        idx: usize,
        type_name: &str,
        category: TypeCategory,
    ) -> DbResult<Value> {
        let raw = row.try_get_raw(idx).map_err(|e| decode_failed(type_name, idx, e))?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        let fail = |e: sqlx::Error| decode_failed(type_name, idx, e);
        match category {
            TypeCategory::Decimal => row.try_get::<RawDecimal, _>(idx).map(|v| Value::Text(v.0)).map_err(fail),
            TypeCategory::Integer => decode_integer(row, idx).map_err(fail),
            TypeCategory::Boolean => row.try_get::<bool, _>(idx).map(Value::Bool).map_err(fail),
            TypeCategory::Float => decode_float(row, idx).map_err(fail),
            TypeCategory::Temporal => decode_temporal(row, idx, type_name),
            TypeCategory::Binary => row.try_get::<Vec<u8>, _>(idx).map(Value::Bytes).map_err(fail),
            // MySQL JSON type should be decoded as serde_json::Value directly
            TypeCategory::Json => row.try_get::<JsonValue, _>(idx).map(Value::Json).map_err(fail),
            _ => decode_text(row, idx, type_name),
        }
    }

    fn decode_integer(row: &MySqlRow, idx: usize) -> Result<Value, sqlx::Error> {
        if let Ok(v) = row.try_get::<i64, _>(idx) {
            return Ok(Value::Int(v));
        }
        if let Ok(v) = row.try_get::<u64, _>(idx) {
            return Ok(Value::from(v));
        }
        // Narrow types (YEAR, BIT) only decode into their exact width
        if let Ok(v) = row.try_get::<u16, _>(idx) {
            return Ok(Value::from(v));
        }
        if let Ok(v) = row.try_get::<u8, _>(idx) {
            return Ok(Value::from(v));
        }
        row.try_get::<i8, _>(idx).map(Value::from)
    }

    fn decode_float(row: &MySqlRow, idx: usize) -> Result<Value, sqlx::Error> {
        if let Ok(v) = row.try_get::<f64, _>(idx) {
            return Ok(Value::Float(v));
        }
        row.try_get::<f32, _>(idx).map(|v| Value::Float(f64::from(v)))
    }

    fn decode_temporal(row: &MySqlRow, idx: usize, type_name: &str) -> DbResult<Value> {
        let result = match type_name.to_lowercase().as_str() {
            "timestamp" => row
                .try_get::<DateTime<Utc>, _>(idx)
                .map(|v| v.to_rfc3339()),
            "date" => row.try_get::<NaiveDate, _>(idx).map(|v| v.to_string()),
            "time" => row.try_get::<NaiveTime, _>(idx).map(|v| v.to_string()),
            _ => row.try_get::<NaiveDateTime, _>(idx).map(|v| v.to_string()),
        };
        match result {
            Ok(s) => Ok(Value::Text(s)),
            // Zero dates and negative TIMEs have no chrono form
            Err(_) => decode_text(row, idx, type_name),
        }
    }

    fn decode_text(row: &MySqlRow, idx: usize, type_name: &str) -> DbResult<Value> {
        row.try_get_unchecked::<String, _>(idx)
            .map(Value::Text)
            .map_err(|e| decode_failed(type_name, idx, e))
    }
}

mod postgres {
    use super::*;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use serde::Serialize;
    use sqlx::postgres::PgValueFormat;
    use sqlx::types::Decimal;

    pub fn decode_column(row: &PgRow, idx: usize, ty: &PgTypeInfo) -> DbResult<Value> {
        let type_name = ty.name();
        let raw = row.try_get_raw(idx).map_err(|e| decode_failed(type_name, idx, e))?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        // Statements without arguments use the simple protocol, which sends
        // every value in its text form.
        let text_format = matches!(raw.format(), PgValueFormat::Text);
        let fail = |e: sqlx::Error| decode_failed(type_name, idx, e);

        if type_name.ends_with("[]") {
            return decode_array(row, idx, type_name);
        }
        match categorize_type(type_name, Engine::Postgres) {
            // NaN, ±Infinity and values beyond 28 significant digits fail here
            TypeCategory::Decimal => row
                .try_get::<Decimal, _>(idx)
                .map(|v| Value::Text(v.to_string()))
                .map_err(fail),
            TypeCategory::Integer => decode_integer(row, idx).map_err(fail),
            TypeCategory::Boolean => row.try_get::<bool, _>(idx).map(Value::Bool).map_err(fail),
            TypeCategory::Float => decode_float(row, idx).map_err(fail),
            TypeCategory::Temporal => decode_temporal(row, idx, type_name).map_err(fail),
            TypeCategory::Binary => row.try_get::<Vec<u8>, _>(idx).map(Value::Bytes).map_err(fail),
            TypeCategory::Json => row.try_get::<JsonValue, _>(idx).map(Value::Json).map_err(fail),
            TypeCategory::Uuid if !text_format => decode_uuid(row, idx, type_name),
            _ => decode_text(row, idx, type_name, text_format),
        }
    }

    /// Text columns, text-format values, and user types such as enums whose
    /// binary form is their label. Other built-in types (INTERVAL, POINT, ...)
    /// have no text decoding in binary form.
    fn decode_text(row: &PgRow, idx: usize, type_name: &str, text_format: bool) -> DbResult<Value> {
        if let Ok(v) = row.try_get::<String, _>(idx) {
            return Ok(Value::Text(v));
        }
        if !text_format && is_builtin(type_name) {
            return Err(decode_failed(
                type_name,
                idx,
                "unsupported type; cast the column to text in the query",
            ));
        }
        row.try_get_unchecked::<String, _>(idx)
            .map(Value::Text)
            .map_err(|e| decode_failed(type_name, idx, e))
    }

    /// Built-in type names are upper case; user types keep their catalog name.
    fn is_builtin(type_name: &str) -> bool {
        !type_name.chars().any(|c| c.is_ascii_lowercase())
    }

    fn decode_integer(row: &PgRow, idx: usize) -> Result<Value, sqlx::Error> {
        if let Ok(v) = row.try_get::<i16, _>(idx) {
            return Ok(Value::from(v));
        }
        if let Ok(v) = row.try_get::<i32, _>(idx) {
            return Ok(Value::from(v));
        }
        row.try_get::<i64, _>(idx).map(Value::Int)
    }

    fn decode_float(row: &PgRow, idx: usize) -> Result<Value, sqlx::Error> {
        if let Ok(v) = row.try_get::<f64, _>(idx) {
            return Ok(Value::Float(v));
        }
        row.try_get::<f32, _>(idx).map(|v| Value::Float(f64::from(v)))
    }

    fn decode_temporal(row: &PgRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
        let text = match type_name.to_lowercase().as_str() {
            "timestamptz" => row
                .try_get::<DateTime<Utc>, _>(idx)
                .map(|v| v.to_rfc3339())?,
            "timestamp" => row.try_get::<NaiveDateTime, _>(idx)?.to_string(),
            "date" => row.try_get::<NaiveDate, _>(idx)?.to_string(),
            _ => row.try_get::<NaiveTime, _>(idx)?.to_string(),
        };
        Ok(Value::Text(text))
    }

    fn decode_uuid(row: &PgRow, idx: usize, type_name: &str) -> DbResult<Value> {
        // UUIDs arrive as 16 raw bytes in the binary protocol
        let bytes = row
            .try_get_unchecked::<Vec<u8>, _>(idx)
            .map_err(|e| decode_failed(type_name, idx, e))?;
        uuid::Uuid::from_slice(&bytes)
            .map(|id| Value::Text(id.to_string()))
            .map_err(|e| decode_failed(type_name, idx, e))
    }

    fn json_array<T: Serialize>(items: Vec<T>) -> Result<Value, serde_json::Error> {
        serde_json::to_value(items).map(Value::Json)
    }

    /// One-dimensional arrays of scalar types become JSON arrays.
    fn decode_array(row: &PgRow, idx: usize, type_name: &str) -> DbResult<Value> {
        let decoded = if let Ok(v) = row.try_get::<Vec<Option<i16>>, _>(idx) {
            json_array(v)
        } else if let Ok(v) = row.try_get::<Vec<Option<i32>>, _>(idx) {
            json_array(v)
        } else if let Ok(v) = row.try_get::<Vec<Option<i64>>, _>(idx) {
            json_array(v)
        } else if let Ok(v) = row.try_get::<Vec<Option<f64>>, _>(idx) {
            json_array(v)
        } else if let Ok(v) = row.try_get::<Vec<Option<bool>>, _>(idx) {
            json_array(v)
        } else if let Ok(v) = row.try_get::<Vec<Option<String>>, _>(idx) {
            json_array(v)
        } else {
            return Err(decode_failed(
                type_name,
                idx,
                "unsupported array type; cast the column to text in the query",
            ));
        };
        decoded.map_err(|e| decode_failed(type_name, idx, e))
    }
}

mod sqlite {
    use super::*;

    pub fn decode_column(row: &SqliteRow, idx: usize, declared: TypeCategory) -> DbResult<Value> {
        let raw = row.try_get_raw(idx).map_err(|e| decode_failed("?", idx, e))?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        let storage = raw.type_info().name().to_uppercase();
        let fail = |e: sqlx::Error| decode_failed(&storage, idx, e);

        match storage.as_str() {
            s if s.contains("INT") || s == "BOOLEAN" => row
                .try_get_unchecked::<i64, _>(idx)
                .map(|v| match declared {
                    TypeCategory::Boolean => Value::Bool(v != 0),
                    _ => Value::Int(v),
                })
                .map_err(fail),
            "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => row
                .try_get_unchecked::<f64, _>(idx)
                .map(Value::Float)
                .map_err(fail),
            "BLOB" => row
                .try_get_unchecked::<Vec<u8>, _>(idx)
                .map(Value::Bytes)
                .map_err(fail),
            _ => {
                let text = row.try_get_unchecked::<String, _>(idx).map_err(fail)?;
                // The declared type is only a hint; malformed JSON stays text
                if declared == TypeCategory::Json {
                    if let Ok(json) = serde_json::from_str::<JsonValue>(&text) {
                        return Ok(Value::Json(json));
                    }
                }
                Ok(Value::Text(text))
            }
        }
    }
}

// =============================================================================
// Type Normalization
// =============================================================================

/// Normalize a database type name to a more consistent format.
pub fn normalize_type_name(type_name: &str) -> String {
    let lower = type_name.to_lowercase();

    match lower.as_str() {
        // Integers
        "int4" | "integer" | "int" => "integer".to_string(),
        "int8" | "bigint" | "bigserial" => "bigint".to_string(),
        "int2" | "smallint" => "smallint".to_string(),
        "tinyint" | "tiny" => "tinyint".to_string(),
        // Text
        "varchar" | "character varying" | "text" | "string" => "text".to_string(),
        "char" | "character" | "bpchar" => "char".to_string(),
        // Boolean
        "bool" | "boolean" => "boolean".to_string(),
        // Float
        "float4" | "real" | "float" => "real".to_string(),
        "float8" | "double precision" | "double" => "double".to_string(),
        // Binary
        "bytea" | "blob" | "binary" | "varbinary" => "binary".to_string(),
        // Date/Time
        "timestamp" | "timestamptz" | "datetime" => "timestamp".to_string(),
        "date" => "date".to_string(),
        "time" | "timetz" => "time".to_string(),
        // JSON
        "json" | "jsonb" => "json".to_string(),
        // UUID
        "uuid" => "uuid".to_string(),
        // Default
        _ => lower,
    }
}
