use async_trait::async_trait;
use sheetgate_core::SheetBackend;
use sheetgate_core::errors::{Result, SheetError};
use sheetgate_core::resolver::{ColumnIndex, RowIndex};
use tracing::{debug, info};

use crate::a1;
use crate::client::{MajorDimension, SheetsClient, ValueInputOption};
use crate::errors::GsheetsError;

/// How the spreadsheet to serve is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    Id(String),
    /// Exact title, looked up through Drive.
    Title(String),
}

/// [`SheetBackend`] over one Google spreadsheet. Tables are its worksheets.
#[derive(Debug, Clone)]
pub struct GoogleSheetsBackend {
    client: SheetsClient,
    spreadsheet_id: String,
}

impl GoogleSheetsBackend {
    /// Resolve the spreadsheet and check it's readable.
    pub async fn connect(client: SheetsClient, spreadsheet: SpreadsheetRef) -> Result<Self> {
        let spreadsheet_id = match spreadsheet {
            SpreadsheetRef::Id(id) => id,
            SpreadsheetRef::Title(title) => client.find_spreadsheet(&title).await?,
        };
        let titles = client.sheet_titles(&spreadsheet_id).await?;
        info!(%spreadsheet_id, worksheets = titles.len(), "connected to spreadsheet");

        Ok(GoogleSheetsBackend {
            client,
            spreadsheet_id,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Turn a failed range request into a table error when the worksheet is
    /// missing.
    async fn range_error(&self, table: &str, err: GsheetsError) -> SheetError {
        if !err.is_bad_request() {
            return err.into();
        }
        match self.client.sheet_titles(&self.spreadsheet_id).await {
            Ok(titles) if !titles.iter().any(|t| t == table) => {
                GsheetsError::WorksheetNotFound(table.to_string()).into()
            }
            _ => err.into(),
        }
    }
}

fn check_coordinate(value: usize, what: &str) -> Result<()> {
    if value == 0 {
        return Err(SheetError::BackendFailure(format!(
            "Invalid {what} index 0"
        )));
    }
    Ok(())
}

#[async_trait]
impl SheetBackend for GoogleSheetsBackend {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.client.sheet_titles(&self.spreadsheet_id).await?)
    }

    async fn read_all_rows(&self, table: &str) -> Result<Vec<Vec<String>>> {
        debug!(%table, "reading all rows");
        let range = a1::sheet_range(table);
        match self
            .client
            .get_values(&self.spreadsheet_id, &range, MajorDimension::Rows)
            .await
        {
            Ok(rows) => Ok(rows),
            Err(e) => Err(self.range_error(table, e).await),
        }
    }

    async fn read_column(&self, table: &str, column: ColumnIndex) -> Result<Vec<String>> {
        check_coordinate(column, "column")?;
        debug!(%table, %column, "reading column");
        let range = a1::column_range(table, column);
        match self
            .client
            .get_values(&self.spreadsheet_id, &range, MajorDimension::Columns)
            .await
        {
            Ok(mut columns) => Ok(if columns.is_empty() {
                Vec::new()
            } else {
                columns.swap_remove(0)
            }),
            Err(e) => Err(self.range_error(table, e).await),
        }
    }

    async fn append_row(&self, table: &str, values: Vec<String>) -> Result<()> {
        debug!(%table, "appending row");
        let range = a1::cell_range(table, 1, 1);
        match self
            .client
            .append_row(&self.spreadsheet_id, &range, &values, ValueInputOption::Raw)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => Err(self.range_error(table, e).await),
        }
    }

    async fn update_cell(
        &self,
        table: &str,
        row: RowIndex,
        column: ColumnIndex,
        value: String,
    ) -> Result<()> {
        check_coordinate(row, "row")?;
        check_coordinate(column, "column")?;
        debug!(%table, %row, %column, "updating cell");
        let range = a1::cell_range(table, row, column);
        match self
            .client
            .update_values(
                &self.spreadsheet_id,
                &range,
                &[value],
                ValueInputOption::UserEntered,
            )
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => Err(self.range_error(table, e).await),
        }
    }
}
