/// Parameter binding for prepared statements
///
/// Flight SQL binds parameters as a one-row Arrow record batch. This module
/// encodes `Parameters` into that batch: one column per parameter, named `$1`,
/// `$2`, ... for positional parameters and by key for named ones.
use arrow_array::{
    ArrayRef, BinaryArray, BooleanArray, Float64Array, Int64Array, NullArray, RecordBatch,
    RecordBatchOptions, StringArray, UInt64Array,
};
use arrow_schema::{ArrowError, Field, Schema};
use std::sync::Arc;

use crate::models::{Parameters, Value};

/// Encode statement parameters as a single-row record batch.
///
/// An empty parameter set still yields one row with no columns, so the
/// statement runs once.
pub fn bind_parameters(parameters: &Parameters) -> Result<RecordBatch, ArrowError> {
    let named: Vec<(String, &Value)> = match parameters {
        Parameters::Positional(values) => values
            .iter()
            .enumerate()
            .map(|(i, value)| (format!("${}", i + 1), value))
            .collect(),
        Parameters::Named(pairs) => pairs.iter().map(|(name, value)| (name.clone(), value)).collect(),
    };

    let mut fields = Vec::with_capacity(named.len());
    let mut columns = Vec::with_capacity(named.len());

    for (name, value) in named {
        let array = value_to_array(value);
        fields.push(Field::new(name, array.data_type().clone(), true));
        columns.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(1));
    RecordBatch::try_new_with_options(schema, columns, &options)
}

/// One-element Arrow array holding `value`.
pub fn value_to_array(value: &Value) -> ArrayRef {
    match value {
        Value::Null => Arc::new(NullArray::new(1)),
        Value::Boolean(v) => Arc::new(BooleanArray::from(vec![*v])),
        Value::Integer(v) => Arc::new(Int64Array::from(vec![*v])),
        Value::UInteger(v) => Arc::new(UInt64Array::from(vec![*v])),
        Value::Real(v) => Arc::new(Float64Array::from(vec![*v])),
        Value::Text(v) => Arc::new(StringArray::from(vec![v.as_str()])),
        Value::Blob(v) => Arc::new(BinaryArray::from(vec![&v[..]])),
    }
}
