//! Buffered result cursors.
//!
//! [`Rows`] holds every result set a statement produced and walks them
//! with a forward-only cursor. [`Row`] is the single-row form returned by
//! `query_row`, with its error deferred until it is read.

use crate::db::Value;
use crate::error::{DbError, DbResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Metadata for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub name: String,
    /// Engine type name, e.g. `INT4`, `VARCHAR`, `TEXT`
    pub database_type_name: String,
    pub ordinal: usize,
}

impl ColumnType {
    pub fn new(name: impl Into<String>, database_type_name: impl Into<String>, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            database_type_name: database_type_name.into(),
            ordinal,
        }
    }
}

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Not reported by PostgreSQL; use `RETURNING` instead.
    pub last_insert_id: Option<i64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64, last_insert_id: Option<i64>) -> Self {
        Self {
            rows_affected,
            last_insert_id,
        }
    }
}

/// The rows produced by one statement.
///
/// Columns come with the first row. A lone result set without rows takes
/// them from the prepared statement instead; in a multi-statement batch an
/// empty set has none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Arc<[ColumnType]>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<ColumnType>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.into(),
            rows,
        }
    }

    /// Build a result set from column names alone; handy for fakes.
    pub fn from_names(names: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, name)| ColumnType::new(*name, "", i))
            .collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[ColumnType] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn set_columns(&mut self, columns: Vec<ColumnType>) {
        self.columns = columns.into();
    }

    pub(crate) fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    pub(crate) fn push(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }
}

/// Forward-only cursor over one or more result sets.
///
/// `next` returning `false` means either exhaustion or a failure part way
/// through the stream; check [`Rows::err`] to tell them apart.
#[derive(Debug, Default)]
pub struct Rows {
    sets: Vec<ResultSet>,
    set_idx: usize,
    /// `None` before the first `next` of the current set.
    row_idx: Option<usize>,
    closed: bool,
    err: Option<DbError>,
}

impl Rows {
    pub fn new(sets: Vec<ResultSet>) -> Self {
        Self {
            sets,
            ..Self::default()
        }
    }

    /// A single clean result set that produced no rows, so no columns.
    pub(crate) fn lacks_columns(&self) -> bool {
        self.err.is_none()
            && self.sets.len() == 1
            && self.sets.first().is_some_and(|set| !set.has_columns())
    }

    /// Set the columns of the first result set.
    pub(crate) fn set_columns(&mut self, columns: Vec<ColumnType>) {
        if let Some(set) = self.sets.first_mut() {
            set.set_columns(columns);
        }
    }

    /// Rows whose stream failed after `sets` were received.
    pub fn with_error(sets: Vec<ResultSet>, err: DbError) -> Self {
        Self {
            sets,
            err: Some(err),
            ..Self::default()
        }
    }

    /// Advance to the next row of the current result set.
    pub fn next(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let Some(set) = self.sets.get(self.set_idx) else {
            return false;
        };
        let next = self.row_idx.map_or(0, |i| i + 1);
        self.row_idx = Some(next.min(set.len()));
        next < set.len()
    }

    /// Move to the next result set; `false` when there is none.
    pub fn next_result_set(&mut self) -> bool {
        if self.closed || self.set_idx + 1 >= self.sets.len() {
            return false;
        }
        self.set_idx += 1;
        self.row_idx = None;
        true
    }

    /// Release the buffered rows. Safe to call any number of times.
    pub fn close(&mut self) {
        self.closed = true;
        self.sets.clear();
        self.row_idx = None;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The error that ended iteration early, if any.
    pub fn err(&self) -> Option<&DbError> {
        self.err.as_ref()
    }

    pub fn columns(&self) -> Vec<String> {
        self.column_types()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn column_types(&self) -> &[ColumnType] {
        self.sets
            .get(self.set_idx)
            .map(ResultSet::columns)
            .unwrap_or(&[])
    }

    fn current(&self) -> DbResult<&[Value]> {
        if self.closed {
            return Err(DbError::decode("rows are closed"));
        }
        self.sets
            .get(self.set_idx)
            .zip(self.row_idx)
            .and_then(|(set, idx)| set.rows.get(idx))
            .map(Vec::as_slice)
            .ok_or_else(|| DbError::decode("no current row; call next first"))
    }

    /// Decode the current row positionally, e.g. into a tuple.
    pub fn scan<T: DeserializeOwned>(&self) -> DbResult<T> {
        decode_positional(self.current()?)
    }

    /// Decode the current row by column name into a struct.
    pub fn struct_scan<T: DeserializeOwned>(&self) -> DbResult<T> {
        decode_named(self.column_types(), self.current()?)
    }

    pub fn map_scan(&self) -> DbResult<HashMap<String, Value>> {
        Ok(to_map(self.column_types(), self.current()?))
    }

    pub fn slice_scan(&self) -> DbResult<Vec<Value>> {
        Ok(self.current()?.to_vec())
    }

    /// Decode every remaining row of the current result set.
    ///
    /// Single-column rows decode as scalars when `T` allows it, otherwise
    /// rows decode by column name.
    pub fn collect<T: DeserializeOwned>(&mut self) -> DbResult<Vec<T>> {
        let mut out = Vec::new();
        while self.next() {
            out.push(decode_flexible(self.column_types(), self.current()?)?);
        }
        match self.err.take() {
            Some(err) => Err(err),
            None => Ok(out),
        }
    }

    /// Number of rows left in the current result set.
    pub(crate) fn remaining(&self) -> usize {
        let len = self.sets.get(self.set_idx).map_or(0, ResultSet::len);
        let consumed = self.row_idx.map_or(0, |i| i + 1);
        len.saturating_sub(consumed)
    }
}

/// A single row, or the error that prevented reading one.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<[ColumnType]>,
    values: Result<Vec<Value>, DbError>,
}

impl Row {
    pub fn new(columns: Vec<ColumnType>, values: Vec<Value>) -> Self {
        Self {
            columns: columns.into(),
            values: Ok(values),
        }
    }

    /// A row that only carries an error.
    pub fn from_error(err: DbError) -> Self {
        Self {
            columns: Arc::from(Vec::new()),
            values: Err(err),
        }
    }

    /// Take the first row of the first result set.
    pub fn from_rows(rows: DbResult<Rows>) -> Self {
        let mut rows = match rows {
            Ok(rows) => rows,
            Err(err) => return Self::from_error(err),
        };
        if let Some(err) = rows.err.take() {
            if rows.sets.first().is_none_or(ResultSet::is_empty) {
                return Self::from_error(err);
            }
        }
        let mut sets = std::mem::take(&mut rows.sets).into_iter();
        match sets.next() {
            Some(ResultSet { columns, rows }) if !rows.is_empty() => Self {
                columns,
                values: Ok(rows.into_iter().next().unwrap_or_default()),
            },
            _ => Self::from_error(DbError::NoRows),
        }
    }

    pub fn err(&self) -> Option<&DbError> {
        self.values.as_ref().err()
    }

    pub fn columns(&self) -> DbResult<Vec<String>> {
        self.values()?;
        Ok(self.columns.iter().map(|c| c.name.clone()).collect())
    }

    pub fn column_types(&self) -> DbResult<&[ColumnType]> {
        self.values()?;
        Ok(&self.columns)
    }

    fn values(&self) -> DbResult<&[Value]> {
        self.values.as_deref().map_err(Clone::clone)
    }

    /// Decode positionally, e.g. into a tuple or a scalar.
    pub fn scan<T: DeserializeOwned>(&self) -> DbResult<T> {
        decode_positional(self.values()?)
    }

    /// Decode by column name into a struct; serde field names are the tags.
    pub fn struct_scan<T: DeserializeOwned>(&self) -> DbResult<T> {
        decode_named(&self.columns, self.values()?)
    }

    pub fn map_scan(&self) -> DbResult<HashMap<String, Value>> {
        Ok(to_map(&self.columns, self.values()?))
    }

    pub fn slice_scan(&self) -> DbResult<Vec<Value>> {
        Ok(self.values()?.to_vec())
    }

    /// Scalar for single-column rows, struct otherwise.
    pub fn get<T: DeserializeOwned>(&self) -> DbResult<T> {
        decode_flexible(&self.columns, self.values()?)
    }
}

fn to_json_array(values: &[Value]) -> DbResult<JsonValue> {
    Ok(serde_json::to_value(values)?)
}

fn to_json_object(columns: &[ColumnType], values: &[Value]) -> DbResult<JsonValue> {
    let mut map = Map::with_capacity(values.len());
    for (col, value) in columns.iter().zip(values) {
        map.insert(col.name.clone(), serde_json::to_value(value)?);
    }
    Ok(JsonValue::Object(map))
}

fn to_map(columns: &[ColumnType], values: &[Value]) -> HashMap<String, Value> {
    columns
        .iter()
        .zip(values)
        .map(|(col, value)| (col.name.clone(), value.clone()))
        .collect()
}

fn decode_positional<T: DeserializeOwned>(values: &[Value]) -> DbResult<T> {
    if let [single] = values {
        if let Ok(v) = serde_json::to_value(single).and_then(serde_json::from_value) {
            return Ok(v);
        }
    }
    Ok(serde_json::from_value(to_json_array(values)?)?)
}

fn decode_named<T: DeserializeOwned>(columns: &[ColumnType], values: &[Value]) -> DbResult<T> {
    Ok(serde_json::from_value(to_json_object(columns, values)?)?)
}

fn decode_flexible<T: DeserializeOwned>(columns: &[ColumnType], values: &[Value]) -> DbResult<T> {
    if values.len() == 1 {
        return decode_positional(values).or_else(|_| decode_named(columns, values));
    }
    decode_named(columns, values).or_else(|_| decode_positional(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: i64,
        name: String,
        email: Option<String>,
    }

    fn users() -> ResultSet {
        ResultSet::from_names(
            &["id", "name", "email"],
            vec![
                crate::args![1, "alice", "a@example.com"],
                crate::args![2, "bob", None::<String>],
            ],
        )
    }

    #[test]
    fn test_rows_cursor() {
        let mut rows = Rows::new(vec![users()]);
        assert_eq!(rows.columns(), vec!["id", "name", "email"]);
        assert!(rows.scan::<i64>().is_err());

        assert!(rows.next());
        let (id, name): (i64, String) = {
            let (id, name, _): (i64, String, Option<String>) = rows.scan().unwrap();
            (id, name)
        };
        assert_eq!((id, name.as_str()), (1, "alice"));

        assert!(rows.next());
        let user: User = rows.struct_scan().unwrap();
        assert_eq!(user.email, None);

        assert!(!rows.next());
        assert!(!rows.next());
        assert!(rows.err().is_none());
    }

    #[test]
    fn test_rows_multiple_result_sets() {
        let second = ResultSet::from_names(&["n"], vec![crate::args![10], crate::args![20]]);
        let mut rows = Rows::new(vec![users(), second]);

        assert!(rows.next());
        assert!(rows.next_result_set());
        assert_eq!(rows.columns(), vec!["n"]);
        assert_eq!(rows.collect::<i64>().unwrap(), vec![10, 20]);
        assert!(!rows.next_result_set());
    }

    #[test]
    fn test_rows_close_is_idempotent() {
        let mut rows = Rows::new(vec![users()]);
        assert!(rows.next());
        rows.close();
        rows.close();
        assert!(rows.is_closed());
        assert!(!rows.next());
        assert!(!rows.next_result_set());
        assert!(rows.map_scan().is_err());
    }

    #[test]
    fn test_rows_deferred_error() {
        let mut rows = Rows::with_error(vec![users()], DbError::other("stream broke"));
        assert!(rows.next());
        assert!(rows.next());
        assert!(!rows.next());
        assert_eq!(rows.err().map(ToString::to_string).as_deref(), Some("stream broke"));

        let mut rows = Rows::with_error(vec![users()], DbError::other("stream broke"));
        assert!(rows.collect::<User>().is_err());
    }

    #[test]
    fn test_rows_map_and_slice_scan() {
        let mut rows = Rows::new(vec![users()]);
        assert!(rows.next());
        let map = rows.map_scan().unwrap();
        assert_eq!(map["name"], Value::Text("alice".into()));
        assert_eq!(rows.slice_scan().unwrap().len(), 3);
        assert_eq!(rows.remaining(), 1);
    }

    #[test]
    fn test_row_from_rows() {
        let row = Row::from_rows(Ok(Rows::new(vec![users()])));
        assert!(row.err().is_none());
        let user: User = row.get().unwrap();
        assert_eq!(user.name, "alice");
        assert_eq!(row.columns().unwrap().len(), 3);
    }

    #[test]
    fn test_row_no_rows() {
        let row = Row::from_rows(Ok(Rows::new(vec![ResultSet::default()])));
        assert!(matches!(row.err(), Some(DbError::NoRows)));
        assert!(matches!(row.scan::<i64>(), Err(DbError::NoRows)));

        let row = Row::from_rows(Ok(Rows::new(Vec::new())));
        assert!(matches!(row.err(), Some(DbError::NoRows)));
    }

    #[test]
    fn test_row_carries_query_error() {
        let row = Row::from_rows(Err(DbError::other("boom")));
        assert_eq!(row.err().unwrap().to_string(), "boom");
        assert!(row.map_scan().is_err());
        assert!(row.column_types().is_err());
    }

    #[test]
    fn test_row_scalar_and_tuple() {
        let row = Row::new(vec![ColumnType::new("count", "BIGINT", 0)], crate::args![42]);
        assert_eq!(row.scan::<i64>().unwrap(), 42);
        assert_eq!(row.scan::<(i64,)>().unwrap(), (42,));
        assert_eq!(row.get::<i64>().unwrap(), 42);

        #[derive(Deserialize)]
        struct Count {
            count: i64,
        }
        assert_eq!(row.get::<Count>().unwrap().count, 42);
    }

    #[test]
    fn test_row_slice_scan_keeps_bytes() {
        let row = Row::new(
            vec![ColumnType::new("data", "BLOB", 0)],
            vec![Value::Bytes(vec![1, 2])],
        );
        assert_eq!(row.slice_scan().unwrap(), vec![Value::Bytes(vec![1, 2])]);
        assert_eq!(row.scan::<Vec<u8>>().unwrap(), vec![1, 2]);
    }
}
