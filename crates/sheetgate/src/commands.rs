use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use sheetgate_core::SheetBackend;
use sheetgate_core::memory::MemoryBackend;
use sheetgate_gsheets::SpreadsheetRef;
use tokio::net::TcpListener;
use tokio::runtime::{Builder, Runtime};
use tracing::info;

use crate::args::{OpenApiArgs, ServerArgs};
use crate::openapi;
use crate::server::SheetServer;

/// Name of the sheet created by `--in-memory`.
const IN_MEMORY_SHEET: &str = "Sheet1";

#[derive(Subcommand)]
pub enum Commands {
    /// Starts the http server.
    Server(ServerArgs),
    /// Prints the OpenAPI document and exits.
    Openapi(OpenApiArgs),
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Server(server) => server.run(),
            Commands::Openapi(openapi) => openapi.run(),
        }
    }
}

trait RunCommand {
    fn run(self) -> Result<()>;
}

impl RunCommand for ServerArgs {
    fn run(self) -> Result<()> {
        let runtime = build_runtime("server")?;
        runtime.block_on(async move {
            let backend: Arc<dyn SheetBackend> = if self.in_memory {
                info!("serving an in-memory spreadsheet");
                let backend = MemoryBackend::new();
                backend.insert_table(IN_MEMORY_SHEET, Vec::new());
                Arc::new(backend)
            } else {
                let spreadsheet = match self.spreadsheet_id {
                    Some(id) => SpreadsheetRef::Id(id),
                    None => SpreadsheetRef::Title(self.spreadsheet),
                };
                info!(path = %self.service_account_path.display(), ?spreadsheet, "connecting to google sheets");
                let backend = sheetgate_gsheets::connect_with_service_account(
                    &self.service_account_path,
                    spreadsheet,
                )
                .await?;
                Arc::new(backend)
            };

            let listener = TcpListener::bind(&self.bind).await?;
            let server = SheetServer::builder()
                .with_listener(listener)
                .with_backend(backend)
                .with_default_table_opt(self.default_sheet)
                .with_public_url_opt(self.public_url)
                .connect()
                .await?;
            server.serve().await
        })
    }
}

impl RunCommand for OpenApiArgs {
    fn run(self) -> Result<()> {
        let doc = openapi::document(self.public_url.as_deref());
        println!("{}", serde_json::to_string_pretty(&doc)?);
        Ok(())
    }
}

fn build_runtime(thread_label: &'static str) -> Result<Runtime> {
    let runtime = Builder::new_multi_thread()
        .thread_name(format!("sheetgate-{thread_label}"))
        .enable_all()
        .build()?;

    Ok(runtime)
}
