// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors
#![allow(clippy::too_many_arguments)]

pub mod app;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Shorthand re-exports used throughout the crate.
pub use infrastructure::data;
pub use infrastructure::network;
pub use services::deploy;
