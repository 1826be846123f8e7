//! In-memory backend.
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::backend::SheetBackend;
use crate::errors::{Result, SheetError, backend_failure};
use crate::resolver::{ColumnIndex, RowIndex};

type Rows = Vec<Vec<String>>;

/// A spreadsheet kept entirely in memory.
///
/// Behaves like the remote spreadsheet for the operations in
/// [`SheetBackend`]: appends land after the last non-empty row, and updating a
/// cell outside the current bounds grows the table.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<Vec<(String, Rows)>>,
    writes: Mutex<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a table.
    pub fn with_table<S: Into<String>>(self, name: S, rows: Vec<Vec<&str>>) -> Self {
        self.insert_table(
            name,
            rows.into_iter()
                .map(|row| row.into_iter().map(String::from).collect())
                .collect(),
        );
        self
    }

    pub fn insert_table<S: Into<String>>(&self, name: S, rows: Rows) {
        let name = name.into();
        let mut tables = self.tables.lock();
        match tables.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = rows,
            None => tables.push((name, rows)),
        }
    }

    /// Copy of a table's current rows.
    pub fn snapshot(&self, table: &str) -> Option<Rows> {
        self.tables
            .lock()
            .iter()
            .find(|(n, _)| n == table)
            .map(|(_, rows)| rows.clone())
    }

    /// Number of writes (appends and cell updates) performed so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }

    fn with_rows<F, T>(&self, table: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Rows) -> Result<T>,
    {
        let mut tables = self.tables.lock();
        let (_, rows) = tables
            .iter_mut()
            .find(|(n, _)| n == table)
            .ok_or_else(|| SheetError::TableNotFound(table.to_string()))?;
        f(rows)
    }

    fn record_write(&self) {
        *self.writes.lock() += 1;
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

#[async_trait]
impl SheetBackend for MemoryBackend {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.lock().iter().map(|(n, _)| n.clone()).collect())
    }

    async fn read_all_rows(&self, table: &str) -> Result<Vec<Vec<String>>> {
        self.with_rows(table, |rows| {
            // Trailing blank rows are never returned by the remote side.
            let len = rows.iter().rposition(|row| !is_blank(row)).map_or(0, |i| i + 1);
            Ok(rows[..len].to_vec())
        })
    }

    async fn read_column(&self, table: &str, column: ColumnIndex) -> Result<Vec<String>> {
        if column == 0 {
            return Err(backend_failure!("Invalid column index 0"));
        }
        self.with_rows(table, |rows| {
            let mut values: Vec<String> = rows
                .iter()
                .map(|row| row.get(column - 1).cloned().unwrap_or_default())
                .collect();
            while values.last().is_some_and(|v| v.is_empty()) {
                values.pop();
            }
            Ok(values)
        })
    }

    async fn append_row(&self, table: &str, values: Vec<String>) -> Result<()> {
        self.with_rows(table, |rows| {
            let len = rows.iter().rposition(|row| !is_blank(row)).map_or(0, |i| i + 1);
            rows.truncate(len);
            debug!(%table, row = len + 1, "memory append");
            rows.push(values);
            Ok(())
        })?;
        self.record_write();
        Ok(())
    }

    async fn update_cell(
        &self,
        table: &str,
        row: RowIndex,
        column: ColumnIndex,
        value: String,
    ) -> Result<()> {
        if row == 0 || column == 0 {
            return Err(backend_failure!("Invalid cell coordinate ({row}, {column})"));
        }
        self.with_rows(table, |rows| {
            if rows.len() < row {
                rows.resize_with(row, Vec::new);
            }
            let cells = &mut rows[row - 1];
            if cells.len() < column {
                cells.resize_with(column, String::new);
            }
            debug!(%table, %row, %column, "memory update cell");
            cells[column - 1] = value;
            Ok(())
        })?;
        self.record_write();
        Ok(())
    }
}
