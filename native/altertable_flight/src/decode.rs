/// Decoding and type conversion utilities
///
/// This module converts Arrow columnar data into row-oriented `Value` tuples.
/// Arrow types with a direct `Value` counterpart are converted losslessly; every
/// other type (dates, timestamps, decimals, intervals, nested and dictionary
/// arrays) is rendered to text with Arrow's display formatter.
use arrow_array::cast::AsArray;
use arrow_array::types::*;
use arrow_array::Array;
use arrow_cast::display::{ArrayFormatter, FormatOptions};
use arrow_schema::{ArrowError, DataType};
use bytes::Bytes;

use crate::models::{ColumnDescriptor, ResultTable, Row, Value};

/// Column metadata for a result table, one descriptor per field, in order.
///
/// Duplicate column names are passed through unchanged.
pub fn table_columns(table: &ResultTable) -> Vec<ColumnDescriptor> {
    table
        .schema()
        .fields()
        .iter()
        .map(|field| ColumnDescriptor::new(field.name().clone(), field.data_type().clone()))
        .collect()
}

/// Transpose a columnar result table into row tuples.
///
/// Row `i` of a batch is `(col_0[i], ..., col_{C-1}[i])`. Batches are appended in
/// order. A table without columns yields no rows, whatever its row count.
pub fn table_to_rows(table: &ResultTable) -> Result<Vec<Row>, ArrowError> {
    let column_count = table.num_columns();
    if column_count == 0 {
        return Ok(Vec::new());
    }

    let mut rows = Vec::with_capacity(table.num_rows());

    for batch in table.batches() {
        if batch.num_columns() != column_count {
            return Err(ArrowError::SchemaError(format!(
                "record batch has {} columns, result schema has {column_count}",
                batch.num_columns()
            )));
        }

        let mut columns = batch
            .columns()
            .iter()
            .map(|array| decode_column(array.as_ref()).map(Vec::into_iter))
            .collect::<Result<Vec<_>, _>>()?;

        for _ in 0..batch.num_rows() {
            let row: Row = columns
                .iter_mut()
                .map(|column| column.next().unwrap_or(Value::Null))
                .collect();
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Decode one Arrow array into a buffer of values, nulls preserved.
pub fn decode_column(array: &dyn Array) -> Result<Vec<Value>, ArrowError> {
    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; array.len()],
        DataType::Boolean => collect(array.as_boolean().iter(), Value::Boolean),
        DataType::Int8 => collect(array.as_primitive::<Int8Type>().iter(), |v| {
            Value::Integer(i64::from(v))
        }),
        DataType::Int16 => collect(array.as_primitive::<Int16Type>().iter(), |v| {
            Value::Integer(i64::from(v))
        }),
        DataType::Int32 => collect(array.as_primitive::<Int32Type>().iter(), |v| {
            Value::Integer(i64::from(v))
        }),
        DataType::Int64 => collect(array.as_primitive::<Int64Type>().iter(), Value::Integer),
        DataType::UInt8 => collect(array.as_primitive::<UInt8Type>().iter(), |v| {
            Value::UInteger(u64::from(v))
        }),
        DataType::UInt16 => collect(array.as_primitive::<UInt16Type>().iter(), |v| {
            Value::UInteger(u64::from(v))
        }),
        DataType::UInt32 => collect(array.as_primitive::<UInt32Type>().iter(), |v| {
            Value::UInteger(u64::from(v))
        }),
        DataType::UInt64 => collect(array.as_primitive::<UInt64Type>().iter(), Value::UInteger),
        DataType::Float16 => collect(array.as_primitive::<Float16Type>().iter(), |v| {
            Value::Real(v.to_f64())
        }),
        DataType::Float32 => collect(array.as_primitive::<Float32Type>().iter(), |v| {
            Value::Real(f64::from(v))
        }),
        DataType::Float64 => collect(array.as_primitive::<Float64Type>().iter(), Value::Real),
        DataType::Utf8 => collect(array.as_string::<i32>().iter(), text),
        DataType::LargeUtf8 => collect(array.as_string::<i64>().iter(), text),
        DataType::Utf8View => collect(array.as_string_view().iter(), text),
        DataType::Binary => collect(array.as_binary::<i32>().iter(), blob),
        DataType::LargeBinary => collect(array.as_binary::<i64>().iter(), blob),
        DataType::BinaryView => collect(array.as_binary_view().iter(), blob),
        DataType::FixedSizeBinary(_) => collect(array.as_fixed_size_binary().iter(), blob),
        _ => format_column(array)?,
    };

    Ok(values)
}

fn collect<T>(iter: impl Iterator<Item = Option<T>>, convert: impl Fn(T) -> Value) -> Vec<Value> {
    iter.map(|v| v.map_or(Value::Null, &convert)).collect()
}

fn text(v: &str) -> Value {
    Value::Text(v.to_string())
}

fn blob(v: &[u8]) -> Value {
    Value::Blob(Bytes::copy_from_slice(v))
}

/// Nulls are read from the logical null mask, so dictionary, run-end encoded
/// and union arrays report nulls held in their child arrays.
fn format_column(array: &dyn Array) -> Result<Vec<Value>, ArrowError> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array, &options)?;
    let nulls = array.logical_nulls();

    Ok((0..array.len())
        .map(|i| {
            if nulls.as_ref().is_some_and(|n| n.is_null(i)) {
                Value::Null
            } else {
                Value::Text(formatter.value(i).to_string())
            }
        })
        .collect())
}
