use assert_cmd::cmd::Command;

/// How long a server is left running before the test stops it.
pub const SERVER_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(3);

pub fn make_cli() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).expect("Failed to find binary");
    // Settings from the environment would leak into argument parsing.
    for var in [
        "SHEETGATE_BIND",
        "SHEETGATE_SERVICE_ACCOUNT_PATH",
        "SHEETGATE_SPREADSHEET",
        "SHEETGATE_SPREADSHEET_ID",
        "SHEETGATE_DEFAULT_SHEET",
        "SHEETGATE_PUBLIC_URL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// `sheetgate server` bound to an ephemeral local port, logging json lines to
/// stdout.
pub fn make_server_cli() -> Command {
    let mut cmd = make_cli();
    cmd.timeout(SERVER_TIMEOUT)
        .args(["--log-mode", "json", "server"])
        .args(["--bind", "127.0.0.1:0"]);
    cmd
}
