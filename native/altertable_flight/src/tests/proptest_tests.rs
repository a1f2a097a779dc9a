//! Property-based tests using proptest
//!
//! These tests verify invariants that should hold for all inputs,
//! helping catch edge cases that unit tests might miss.

// Allow unwrap() in tests for cleaner test code
#![allow(clippy::unwrap_used)]

use arrow_array::{ArrayRef, Int64Array, StringArray};
use proptest::prelude::*;
use std::sync::Arc;

use super::test_utils::{sample_credentials, MockServer};
use crate::connection::Connection;
use crate::credentials::Credentials;
use crate::decode::table_to_rows;
use crate::error::AdapterError;
use crate::models::{ResultTable, Value};

fn table_from(rows: &[(i64, String)]) -> ResultTable {
    let ids: ArrayRef = Arc::new(Int64Array::from_iter_values(rows.iter().map(|(id, _)| *id)));
    let names: ArrayRef = Arc::new(StringArray::from_iter_values(
        rows.iter().map(|(_, name)| name.as_str()),
    ));
    ResultTable::try_from_columns([("id", ids), ("name", names)]).unwrap()
}

proptest! {
    /// Property: the URI is always scheme, host and port joined in that order
    #[test]
    fn uri_follows_scheme_host_port(
        host in "[a-z0-9][a-z0-9.-]{0,30}",
        port in any::<u16>(),
        tls in any::<bool>()
    ) {
        let creds = Credentials::new("user", "secret")
            .with_host(host.clone())
            .with_port(i64::from(port))
            .unwrap()
            .with_tls(tls);

        let scheme = if tls { "grpc+tls" } else { "grpc" };
        prop_assert_eq!(creds.uri(), format!("{scheme}://{host}:{port}"));
        let target = creds.build_target();
        prop_assert_eq!(target.uri(), creds.uri());
    }

    /// Property: every port outside the u16 range is rejected
    #[test]
    fn out_of_range_ports_rejected(
        port in prop_oneof![i64::MIN..0i64, 65536i64..=i64::MAX]
    ) {
        let result = Credentials::new("user", "secret").with_port(port);
        prop_assert!(matches!(result, Err(AdapterError::InvalidConfiguration(_))));
    }

    /// Property: row i holds the i-th value of every column
    #[test]
    fn rows_zip_columns(rows in prop::collection::vec((any::<i64>(), ".{0,12}"), 0..50)) {
        let decoded = table_to_rows(&table_from(&rows)).unwrap();

        prop_assert_eq!(decoded.len(), rows.len());
        for (row, (id, name)) in decoded.iter().zip(&rows) {
            prop_assert_eq!(row, &vec![Value::Integer(*id), Value::Text(name.clone())]);
        }
    }

    /// Property: fetch_many returns min(size, remaining) rows and advances by that much
    #[test]
    fn fetch_many_takes_at_most_remaining(
        total in 0usize..40,
        sizes in prop::collection::vec(0usize..10, 1..12)
    ) {
        let rows: Vec<(i64, String)> = (0..total)
            .map(|i| (i64::try_from(i).unwrap(), format!("row{i}")))
            .collect();
        let server = MockServer::new().with_table("SELECT *", table_from(&rows));
        let mut conn = Connection::new("prop", sample_credentials());
        conn.open(&server).unwrap();
        let mut cursor = conn.cursor();
        cursor.execute("SELECT *", None).unwrap();

        let mut position = 0usize;
        for size in sizes {
            let batch = cursor.fetch_many(Some(size));
            let expected = size.min(total - position);

            prop_assert_eq!(batch.len(), expected);
            if let Some(first) = batch.first() {
                prop_assert_eq!(&first[0], &Value::Integer(i64::try_from(position).unwrap()));
            }
            position += expected;
            prop_assert_eq!(cursor.position(), position);
        }

        prop_assert_eq!(cursor.fetch_all().len(), total - position);
    }
}
