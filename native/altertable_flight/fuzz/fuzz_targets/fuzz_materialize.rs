#![no_main]
//! Structured fuzzing of result materialization
//!
//! Builds two-column result tables from arbitrary nullable values and checks
//! that every row is the zip of the columns at its index.

use altertable_flight::decode::table_to_rows;
use altertable_flight::{ResultTable, Value};
use arbitrary::Arbitrary;
use arrow_array::{ArrayRef, Int64Array, StringArray};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug, Arbitrary)]
struct TableInput {
    rows: Vec<(Option<i64>, Option<String>)>,
}

fuzz_target!(|input: TableInput| {
    let ids: ArrayRef = Arc::new(Int64Array::from_iter(input.rows.iter().map(|(id, _)| *id)));
    let names: ArrayRef = Arc::new(StringArray::from_iter(
        input.rows.iter().map(|(_, name)| name.as_deref()),
    ));
    let Ok(table) = ResultTable::try_from_columns([("id", ids), ("name", names)]) else {
        return;
    };

    let rows = table_to_rows(&table).expect("well-formed table must materialize");
    assert_eq!(rows.len(), input.rows.len());

    for (row, (id, name)) in rows.iter().zip(&input.rows) {
        assert_eq!(row.len(), 2);
        assert_eq!(row[0], Value::from(*id));
        assert_eq!(row[1], Value::from(name.clone()));
    }
});
