use std::path::PathBuf;

use clap::Args;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_SERVICE_ACCOUNT_PATH: &str = "/etc/secrets/credentials.json";
pub const DEFAULT_SPREADSHEET: &str = "Chatgpt_Freelances";

#[derive(Args, Debug)]
pub struct ServerArgs {
    /// TCP address to bind to.
    #[arg(short = 'b', long, env = "SHEETGATE_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Path to the Google service account key file.
    #[arg(
        short,
        long,
        env = "SHEETGATE_SERVICE_ACCOUNT_PATH",
        default_value = DEFAULT_SERVICE_ACCOUNT_PATH
    )]
    pub service_account_path: PathBuf,

    /// Title of the spreadsheet to serve.
    ///
    /// The spreadsheet must be shared with the service account.
    #[arg(
        long,
        env = "SHEETGATE_SPREADSHEET",
        default_value = DEFAULT_SPREADSHEET,
        conflicts_with = "spreadsheet_id"
    )]
    pub spreadsheet: String,

    /// Id of the spreadsheet to serve, instead of looking it up by title.
    #[arg(long, env = "SHEETGATE_SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Sheet used when a request doesn't name one.
    ///
    /// Defaults to the first sheet of the spreadsheet.
    #[arg(long, env = "SHEETGATE_DEFAULT_SHEET")]
    pub default_sheet: Option<String>,

    /// Public url advertised in the OpenAPI document.
    #[arg(long, env = "SHEETGATE_PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Serve an in-memory spreadsheet instead of Google Sheets.
    ///
    /// (Internal)
    ///
    /// Starts with a single empty sheet, nothing is persisted.
    #[arg(long, hide = true, conflicts_with_all = ["spreadsheet_id"])]
    pub in_memory: bool,
}

#[derive(Args, Debug)]
pub struct OpenApiArgs {
    /// Public url advertised in the document.
    #[arg(long, env = "SHEETGATE_PUBLIC_URL")]
    pub public_url: Option<String>,
}
