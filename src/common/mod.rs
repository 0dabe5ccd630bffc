// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

pub mod retry;

// Shared aliases for frequently used modules.
pub use crate::app::logging as logger;
pub use crate::domain::constants;
pub use crate::domain::error;
