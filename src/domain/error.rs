// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Deployment failed: {0}")]
    Deploy(String),

    #[error("Transaction failed: {hash}, reason: {reason}")]
    Transaction { hash: String, reason: String },

    #[error("Predicted address {predicted} does not match deployed address {actual}")]
    AddressMismatch { predicted: String, actual: String },

    #[error("Validation failed for field {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Address {0} is invalid or not checksummed")]
    InvalidAddress(String),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
