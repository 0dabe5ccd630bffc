// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

pub mod orchestrator;
pub mod predictor;
pub mod routes;
pub mod sender;

pub use orchestrator::{DeployOrchestrator, VaultDeployment};
pub use predictor::{DeployAddressPredictor, predict_create_address};
pub use routes::StrategyRoutes;
pub use sender::TxSender;
