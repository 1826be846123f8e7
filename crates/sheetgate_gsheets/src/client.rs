use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::credentials::TokenSource;
use crate::errors::{GsheetsError, Result};

pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/";
pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3/";

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the http client shared by the token exchange and API calls.
pub fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// Which dimension `values.get` groups cells by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorDimension {
    Rows,
    Columns,
}

impl MajorDimension {
    fn as_str(&self) -> &'static str {
        match self {
            MajorDimension::Rows => "ROWS",
            MajorDimension::Columns => "COLUMNS",
        }
    }
}

/// How written values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInputOption {
    /// Stored as-is.
    Raw,
    /// Parsed as if typed into the UI (numbers, dates, formulas).
    UserEntered,
}

impl ValueInputOption {
    fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct WriteValues<'a> {
    values: [&'a [String]; 1],
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

/// Thin client over the Sheets v4 and Drive v3 REST APIs.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    token: Arc<dyn TokenSource>,
    sheets_base: Url,
    drive_base: Url,
}

impl SheetsClient {
    pub fn new(client: reqwest::Client, token: Arc<dyn TokenSource>) -> Result<Self> {
        Ok(SheetsClient {
            client,
            token,
            sheets_base: Url::parse(SHEETS_BASE_URL)?,
            drive_base: Url::parse(DRIVE_BASE_URL)?,
        })
    }

    /// Point the client at different API roots. Base urls must end with a
    /// slash.
    pub fn with_base_urls(mut self, sheets_base: Url, drive_base: Url) -> Self {
        self.sheets_base = sheets_base;
        self.drive_base = drive_base;
        self
    }

    fn url(base: &Url, segments: &[&str]) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.token.token().await?;
        Ok(self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {token}")))
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: &str, req: RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!(%endpoint, %status, "google api response");
        if !status.is_success() {
            return Err(GsheetsError::Status {
                endpoint: endpoint.to_string(),
                status,
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Find a spreadsheet id by exact title, through Drive.
    ///
    /// When multiple spreadsheets share the title, the first one returned is
    /// used.
    pub async fn find_spreadsheet(&self, title: &str) -> Result<String> {
        let q = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME_TYPE}' and trashed = false",
            title.replace('\\', "\\\\").replace('\'', "\\'")
        );
        let url = Self::url(&self.drive_base, &["files"])?;
        let req = self.request(Method::GET, url).await?.query(&[
            ("q", q.as_str()),
            ("fields", "files(id,name)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);

        let list: FileList = self.send("files.list", req).await?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| GsheetsError::SpreadsheetNotFound(title.to_string()))
    }

    /// Titles of every worksheet in a spreadsheet.
    pub async fn sheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        let url = Self::url(&self.sheets_base, &["spreadsheets", spreadsheet_id])?;
        let req = self
            .request(Method::GET, url)
            .await?
            .query(&[("fields", "sheets.properties.title")]);

        let meta: SpreadsheetMeta = self.send("spreadsheets.get", req).await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    /// Read a range as formatted strings.
    pub async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        dimension: MajorDimension,
    ) -> Result<Vec<Vec<String>>> {
        let url = Self::url(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", range],
        )?;
        let req = self.request(Method::GET, url).await?.query(&[
            ("majorDimension", dimension.as_str()),
            ("valueRenderOption", "FORMATTED_VALUE"),
        ]);

        let range: ValueRange = self.send("values.get", req).await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    /// Append one row after the table found in `range`.
    pub async fn append_row(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &[String],
        input: ValueInputOption,
    ) -> Result<()> {
        let append = format!("{range}:append");
        let url = Self::url(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", append.as_str()],
        )?;
        let req = self
            .request(Method::POST, url)
            .await?
            .query(&[
                ("valueInputOption", input.as_str()),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&WriteValues { values: [values] });

        let _: Value = self.send("values.append", req).await?;
        Ok(())
    }

    /// Overwrite the values in `range`.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &[String],
        input: ValueInputOption,
    ) -> Result<()> {
        let url = Self::url(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", range],
        )?;
        let req = self
            .request(Method::PUT, url)
            .await?
            .query(&[("valueInputOption", input.as_str())])
            .json(&WriteValues { values: [values] });

        let _: Value = self.send("values.update", req).await?;
        Ok(())
    }
}

/// Formatted values are strings already, anything else is stringified.
fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
