use std::fmt::Debug;

use async_trait::async_trait;

use crate::errors::Result;
use crate::resolver::{ColumnIndex, RowIndex};

/// Access to the remote spreadsheet.
///
/// Tables are addressed by name. Row and column indices are 1-based and
/// absolute within the table (row 1 is the header row).
///
/// Implementations must return `SheetError::TableNotFound` for unknown
/// tables, and map every other failure to `SheetError::BackendFailure`.
#[async_trait]
pub trait SheetBackend: Debug + Send + Sync {
    /// Names of all tables, in spreadsheet order.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Read every row of a table.
    ///
    /// Rows may be ragged, trailing empty cells are not guaranteed to be
    /// present.
    async fn read_all_rows(&self, table: &str) -> Result<Vec<Vec<String>>>;

    /// Read all values of a single column, starting at row 1.
    async fn read_column(&self, table: &str, column: ColumnIndex) -> Result<Vec<String>>;

    /// Append a row after the last non-empty row of the table.
    async fn append_row(&self, table: &str, values: Vec<String>) -> Result<()>;

    /// Overwrite a single cell.
    async fn update_cell(
        &self,
        table: &str,
        row: RowIndex,
        column: ColumnIndex,
        value: String,
    ) -> Result<()>;
}
