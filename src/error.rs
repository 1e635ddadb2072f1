// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised by the pocket ledger core.
#[derive(Debug, Error)]
pub enum PocketError {
    #[error("{0}")]
    Validation(String),
    #[error("Unlock required: enter your PIN before changing data")]
    Locked,
    #[error("Incorrect PIN")]
    IncorrectPin,
    #[error("The default category cannot be deleted")]
    SentinelCategory,
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("Import failed: {0}")]
    Import(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PocketError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PocketError::Validation(msg.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        PocketError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PocketError>;
