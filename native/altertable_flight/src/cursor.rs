/// Result cursor over columnar statement results.
///
/// This module handles statement execution and sequential row fetching:
/// - Executing SQL directly or through a prepared statement with parameters
/// - Materializing the columnar result table into row tuples
/// - Fetching one row, a bounded batch, or all remaining rows
/// - Forward-only iteration over the remaining rows
///
/// A cursor holds at most one result at a time; every `execute` replaces it.
/// The whole result is pulled and converted before `execute` returns.
use tracing::{debug, info_span, Span};
use uuid::Uuid;

use crate::constants::{DEFAULT_FETCH_SIZE, UNKNOWN_ROWCOUNT};
use crate::decode;
use crate::error::{AdapterError, Result, TransportError};
use crate::models::{ColumnDescriptor, Parameters, ResultTable, Row};
use crate::transport::{SharedClient, TransportClient};
use crate::utils::safe_lock_arc;

/// Result of the last execution and the fetch position into it
#[derive(Debug)]
struct CursorState {
    columns: Option<Vec<ColumnDescriptor>>,
    rows: Option<Vec<Row>>,
    rowcount: i64,
    position: usize,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            columns: None,
            rows: None,
            rowcount: UNKNOWN_ROWCOUNT,
            position: 0,
        }
    }
}

/// Sequential, row-oriented view of statement results
///
/// Created by [`crate::connection::Connection::cursor`]. The cursor shares its
/// connection's transport client and never opens or closes it.
pub struct Cursor {
    id: String,
    client: SharedClient,
    state: CursorState,
    span: Span,
}

impl Cursor {
    pub(crate) fn new(client: SharedClient, parent: &Span) -> Self {
        let id = Uuid::new_v4().to_string();
        let span = info_span!(parent: parent, "altertable.cursor", cursor_id = %id);

        Self {
            id,
            client,
            state: CursorState::default(),
            span,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Execute a statement and materialize its result.
    ///
    /// Any previous result is discarded first. With `parameters` the statement
    /// goes through the prepared-statement path; without, it runs directly.
    ///
    /// # Arguments
    /// - `sql`: SQL statement text
    /// - `parameters`: Optional positional or named parameters
    ///
    /// Returns the cursor itself for chaining. Transport and conversion errors
    /// are returned as `Execution` carrying `sql`; nothing is retried.
    pub fn execute(&mut self, sql: &str, parameters: Option<&Parameters>) -> Result<&mut Self> {
        let span = self.span.clone();
        let _entered = span.enter();

        self.state = CursorState::default();

        let table = {
            let mut slot = safe_lock_arc(&self.client, "cursor execute")?;
            let client = slot.as_mut().ok_or(AdapterError::ConnectionClosed)?;

            debug!(prepared = parameters.is_some(), "Executing statement");
            fetch_table(&mut **client, sql, parameters)
                .map_err(|e| AdapterError::execution(sql, e))?
        }; // Lock dropped here

        let columns = decode::table_columns(&table);
        let rows = decode::table_to_rows(&table).map_err(|e| AdapterError::execution(sql, e))?;
        let num_rows = table.num_rows();

        debug!(columns = columns.len(), rows = num_rows, "Materialized result");

        self.state.columns = Some(columns);
        self.state.rows = Some(rows);
        self.state.rowcount = i64::try_from(num_rows).unwrap_or(i64::MAX);

        Ok(self)
    }

    /// Columns of the last result, or `None` before execution and after close.
    pub fn columns(&self) -> Option<&[ColumnDescriptor]> {
        self.state.columns.as_deref()
    }

    /// Row count of the last result; `-1` before any execution.
    pub fn rowcount(&self) -> i64 {
        self.state.rowcount
    }

    /// Offset of the next row to fetch.
    pub fn position(&self) -> usize {
        self.state.position
    }

    /// Next row, or `None` once the result is exhausted or absent.
    pub fn fetch_one(&mut self) -> Option<Row> {
        let row = self.state.rows.as_ref()?.get(self.state.position)?.clone();
        self.state.position += 1;
        Some(row)
    }

    /// Up to `size` rows (default 1) from the current position.
    ///
    /// Returns fewer rows at the end of the result and an empty vector once it
    /// is exhausted or absent.
    pub fn fetch_many(&mut self, size: Option<usize>) -> Vec<Row> {
        let size = size.unwrap_or(DEFAULT_FETCH_SIZE);
        self.take_rows(size)
    }

    /// Every remaining row.
    pub fn fetch_all(&mut self) -> Vec<Row> {
        self.take_rows(usize::MAX)
    }

    /// Forward-only iterator over the remaining rows.
    pub fn iter(&mut self) -> RowIter<'_> {
        RowIter { cursor: self }
    }

    /// Drop the current result.
    ///
    /// Columns and rows are cleared; the row count and fetch position stay
    /// readable until the cursor itself is dropped.
    pub fn close(&mut self) {
        self.state.columns = None;
        self.state.rows = None;
    }

    fn take_rows(&mut self, size: usize) -> Vec<Row> {
        let Some(rows) = self.state.rows.as_ref() else {
            return Vec::new();
        };

        let start = self.state.position.min(rows.len());
        let end = start.saturating_add(size).min(rows.len());
        let batch = rows[start..end].to_vec();

        self.state.position = start + batch.len();
        batch
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("client", &"<TransportClient>")
            .finish()
    }
}

/// Iterator driving [`Cursor::fetch_one`] until the result is exhausted
pub struct RowIter<'a> {
    cursor: &'a mut Cursor,
}

impl Iterator for RowIter<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.cursor.fetch_one()
    }
}

impl<'a> IntoIterator for &'a mut Cursor {
    type Item = Row;
    type IntoIter = RowIter<'a>;

    fn into_iter(self) -> RowIter<'a> {
        self.iter()
    }
}

/// Run one statement and pull its whole result.
///
/// The prepared statement stays alive until its result has been read.
fn fetch_table(
    client: &mut dyn TransportClient,
    sql: &str,
    parameters: Option<&Parameters>,
) -> std::result::Result<ResultTable, TransportError> {
    match parameters {
        Some(parameters) => {
            let mut statement = client.prepare(sql)?;
            let reader = statement.query(parameters)?;
            reader.read_all()
        }
        None => client.query(sql)?.read_all(),
    }
}
