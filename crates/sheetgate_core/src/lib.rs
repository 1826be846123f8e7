//! Core of SheetGate: locating rows and columns in a header-driven table, and
//! the request facade that reads and writes through a [`SheetBackend`].
pub mod backend;
pub mod envelope;
pub mod errors;
pub mod memory;
pub mod normalize;
pub mod records;
pub mod request;
pub mod resolver;
pub mod service;

pub use backend::SheetBackend;
pub use errors::{Result, SheetError};
pub use service::SheetService;
