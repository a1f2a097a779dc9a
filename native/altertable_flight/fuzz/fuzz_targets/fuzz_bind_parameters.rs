#![no_main]
//! Structured fuzzing of parameter binding
//!
//! Any mix of parameter values must bind into a single-row batch with one
//! column per parameter.

use altertable_flight::statement::bind_parameters;
use altertable_flight::{Parameters, Value};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum ParamValue {
    Null,
    Boolean(bool),
    Integer(i64),
    UInteger(u64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Null => Value::Null,
            ParamValue::Boolean(v) => Value::from(v),
            ParamValue::Integer(v) => Value::from(v),
            ParamValue::UInteger(v) => Value::from(v),
            ParamValue::Real(v) => Value::from(v),
            ParamValue::Text(v) => Value::from(v),
            ParamValue::Blob(v) => Value::from(v),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct ParamsInput {
    named: bool,
    values: Vec<ParamValue>,
}

fuzz_target!(|input: ParamsInput| {
    let count = input.values.len();
    let values: Vec<Value> = input.values.into_iter().map(Value::from).collect();

    let parameters = if input.named {
        Parameters::Named(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (format!("p{i}"), v))
                .collect(),
        )
    } else {
        Parameters::Positional(values)
    };

    let batch = bind_parameters(&parameters).expect("parameters must always bind");
    assert_eq!(batch.num_columns(), count);
    assert_eq!(batch.num_rows(), 1);
});
