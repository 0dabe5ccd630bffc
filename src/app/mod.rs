// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

pub mod config;
pub mod logging;
