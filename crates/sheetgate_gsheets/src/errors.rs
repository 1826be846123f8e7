use reqwest::StatusCode;
use sheetgate_core::SheetError;

pub type Result<T, E = GsheetsError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum GsheetsError {
    #[error("Unexpected status {status} from {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    #[error("Worksheet '{0}' not found")]
    WorksheetNotFound(String),

    #[error("No spreadsheet named '{0}' is shared with the service account")]
    SpreadsheetNotFound(String),

    #[error("Invalid service account: {0}")]
    InvalidServiceAccount(String),

    #[error("Failed to sign token request: {0}")]
    Signing(String),

    #[error("Failed to read service account file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Form(#[from] serde_urlencoded::ser::Error),
}

impl GsheetsError {
    /// Whether the API rejected the request as malformed.
    ///
    /// The values endpoints answer 400 for ranges on worksheets that don't
    /// exist.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, GsheetsError::Status { status, .. } if *status == StatusCode::BAD_REQUEST)
    }
}

impl From<GsheetsError> for SheetError {
    fn from(err: GsheetsError) -> Self {
        match err {
            GsheetsError::WorksheetNotFound(name) => SheetError::TableNotFound(name),
            other => SheetError::BackendFailure(other.to_string()),
        }
    }
}
