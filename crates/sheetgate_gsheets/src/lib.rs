//! Google Sheets backend.
//!
//! Authenticates as a service account and talks to the Sheets v4 REST API
//! (plus Drive v3 to find a spreadsheet by title).
pub mod a1;
pub mod backend;
pub mod client;
pub mod credentials;
pub mod errors;

use std::path::Path;
use std::sync::Arc;

pub use backend::{GoogleSheetsBackend, SpreadsheetRef};
pub use client::SheetsClient;
use credentials::{ServiceAccount, ServiceAccountTokenSource};

/// Connect to a spreadsheet using the service account key at `key_path`.
pub async fn connect_with_service_account(
    key_path: impl AsRef<Path>,
    spreadsheet: SpreadsheetRef,
) -> sheetgate_core::Result<GoogleSheetsBackend> {
    let account = ServiceAccount::from_file(key_path).await?;
    let http = client::http_client()?;
    let token = Arc::new(ServiceAccountTokenSource::new(account, http.clone()));
    let client = SheetsClient::new(http, token)?;
    GoogleSheetsBackend::connect(client, spreadsheet).await
}
