//! SheetGate exposes a Google spreadsheet as a small REST API meant to be
//! called by a GPT action.
pub mod args;
pub mod commands;
pub mod handlers;
pub mod openapi;
pub mod server;
