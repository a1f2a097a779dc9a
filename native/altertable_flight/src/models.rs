/// Data structures for altertable_flight
///
/// This module defines the core data types shared by the cursor, the connection
/// and the transport boundary: cell values, column metadata, columnar result
/// tables, statement parameters and connection state.
use arrow_array::{ArrayRef, RecordBatch, RecordBatchOptions};
use arrow_schema::{ArrowError, DataType, Schema, SchemaRef};
use bytes::Bytes;
use std::sync::Arc;

use crate::constants::RESPONSE_OK;

/// A single cell of a materialized row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    UInteger(u64),
    Real(f64),
    Text(String),
    Blob(Bytes),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInteger(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(Bytes::from(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One row of a result: exactly one value per result column
pub type Row = Vec<Value>;

/// Name and Arrow type of one result column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Columnar result of one statement, as pulled from the transport
///
/// Holds the result schema and its record batches in arrival order. Every batch
/// shares the table schema.
#[derive(Debug, Clone)]
pub struct ResultTable {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl ResultTable {
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::new(Arc::new(Schema::empty()), Vec::new())
    }

    /// Build a single-batch table from named column arrays of equal length.
    pub fn try_from_columns<I, S>(columns: I) -> Result<Self, ArrowError>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: AsRef<str>,
    {
        let batch = RecordBatch::try_from_iter(columns)?;
        Ok(Self::new(batch.schema(), vec![batch]))
    }

    /// A table with no columns that still reports `num_rows` rows.
    pub fn try_with_row_count(num_rows: usize) -> Result<Self, ArrowError> {
        let schema = Arc::new(Schema::empty());
        let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
        let batch = RecordBatch::try_new_with_options(schema.clone(), Vec::new(), &options)?;
        Ok(Self::new(schema, vec![batch]))
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

/// Statement parameters for the prepared-statement path
#[derive(Debug, Clone, PartialEq)]
pub enum Parameters {
    /// Bound by position
    Positional(Vec<Value>),
    /// Bound by name, in the given order
    Named(Vec<(String, Value)>),
}

impl Parameters {
    pub fn len(&self) -> usize {
        match self {
            Parameters::Positional(values) => values.len(),
            Parameters::Named(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Configured but never opened
    Init,
    /// Transport client connected
    Open,
    /// Closed by the caller
    Closed,
    /// Last open attempt failed
    Fail,
}

/// Status returned to the host after every statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterResponse {
    pub message: String,
    pub rows_affected: i64,
}

impl AdapterResponse {
    pub fn ok(rows_affected: i64) -> Self {
        Self {
            message: RESPONSE_OK.to_string(),
            rows_affected,
        }
    }
}
