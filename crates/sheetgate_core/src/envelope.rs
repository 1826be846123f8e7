//! Response bodies.
//!
//! Field names are part of the contract with the calling agent and stay in
//! French.
use serde::{Deserialize, Serialize};

use crate::errors::SheetError;
use crate::records::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub extrait: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetList {
    pub feuilles_accessibles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lines {
    pub plage: String,
    #[serde(rename = "données")]
    pub donnees: Vec<Record>,
}

/// Failure body for read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub error: String,
}

impl From<SheetError> for Failure {
    fn from(err: SheetError) -> Self {
        Failure {
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

/// Body returned by every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub status: StatusKind,
    pub message: String,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Status {
            status: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Status {
            status: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusKind::Success
    }
}

impl From<SheetError> for Status {
    fn from(err: SheetError) -> Self {
        Status::error(err.to_string())
    }
}
