//! Tests for statement.rs - Parameter binding

// Allow unwrap() in tests for cleaner test code
#![allow(clippy::unwrap_used)]

use arrow_array::cast::AsArray;
use arrow_array::types::Int64Type;
use arrow_array::Array;
use arrow_schema::DataType;

use crate::models::{Parameters, Value};
use crate::statement::{bind_parameters, value_to_array};

#[test]
fn test_positional_parameters_are_numbered() {
    let params = Parameters::Positional(vec![Value::from(42), Value::from("x"), Value::Null]);

    let batch = bind_parameters(&params).unwrap();

    assert_eq!(batch.num_rows(), 1);
    let names: Vec<&str> = batch
        .schema_ref()
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .collect();
    assert_eq!(names, vec!["$1", "$2", "$3"]);
    assert_eq!(batch.column(0).as_primitive::<Int64Type>().value(0), 42);
    assert_eq!(batch.column(1).as_string::<i32>().value(0), "x");
    assert_eq!(batch.column(2).data_type(), &DataType::Null);
    assert_eq!(batch.column(2).logical_null_count(), 1);
}

#[test]
fn test_named_parameters_keep_names_and_order() {
    let params = Parameters::Named(vec![
        ("limit".to_string(), Value::from(10)),
        ("active".to_string(), Value::from(true)),
    ]);

    let batch = bind_parameters(&params).unwrap();
    let schema = batch.schema();

    assert_eq!(schema.field(0).name(), "limit");
    assert_eq!(schema.field(1).name(), "active");
    assert_eq!(schema.field(1).data_type(), &DataType::Boolean);
}

#[test]
fn test_empty_parameters_bind_one_row() {
    let positional = bind_parameters(&Parameters::Positional(Vec::new())).unwrap();
    let named = bind_parameters(&Parameters::Named(Vec::new())).unwrap();

    assert_eq!(positional.num_columns(), 0);
    assert_eq!(positional.num_rows(), 1);
    assert_eq!(named.num_rows(), 1);
}

#[test]
fn test_value_array_types() {
    assert_eq!(value_to_array(&Value::Null).data_type(), &DataType::Null);
    assert_eq!(value_to_array(&Value::from(1u64)).data_type(), &DataType::UInt64);
    assert_eq!(value_to_array(&Value::from(0.5)).data_type(), &DataType::Float64);
    assert_eq!(
        value_to_array(&Value::from(vec![1u8, 2])).data_type(),
        &DataType::Binary
    );
    assert_eq!(value_to_array(&Value::from(None::<i64>)).len(), 1);
}
