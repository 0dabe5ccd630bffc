// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Vaultsmith Contributors

use crate::common::error::AppError;
use alloy::primitives::Bytes;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Compiled contract artifact in the standard Hardhat JSON layout.
///
/// Only the creation bytecode is consumed; the ABI is expressed in code via
/// `sol!` bindings and constructor argument tuples.
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
struct ArtifactFile {
    #[serde(rename = "contractName", default)]
    contract_name: Option<String>,
    bytecode: String,
}

/// Loads artifacts by contract name from a directory of `{Name}.json` files.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load(&self, name: &str) -> Result<ContractArtifact, AppError> {
        let path = self.dir.join(format!("{name}.json"));
        Self::load_from_path(&path, name)
    }

    fn load_from_path(path: &Path, name: &str) -> Result<ContractArtifact, AppError> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "Artifact not found: {}",
                path.display()
            )));
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Artifact read failed {}: {e}", path.display())))?;
        let file: ArtifactFile = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Artifact parse failed {}: {e}", path.display()))
        })?;

        let bytecode = parse_bytecode(&file.bytecode, name)?;
        Ok(ContractArtifact {
            contract_name: file.contract_name.unwrap_or_else(|| name.to_string()),
            bytecode,
        })
    }
}

fn parse_bytecode(raw: &str, name: &str) -> Result<Bytes, AppError> {
    let stripped = raw.trim().trim_start_matches("0x");
    if stripped.is_empty() {
        // Hardhat emits "0x" for abstract contracts and interfaces.
        return Err(AppError::Validation {
            field: format!("{name}.bytecode"),
            message: "artifact has empty bytecode (abstract contract or interface?)".into(),
        });
    }
    let decoded = hex::decode(stripped).map_err(|e| AppError::Validation {
        field: format!("{name}.bytecode"),
        message: format!("invalid hex: {e}"),
    })?;
    Ok(Bytes::from(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_artifact(body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "vaultsmith-artifact-test-{}-{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::write(&path, body).expect("write temp artifact");
        path
    }

    #[test]
    fn loads_hardhat_artifact() {
        let path = write_artifact(r#"{"contractName":"Treasury","bytecode":"0x6080604052"}"#);
        let artifact = ArtifactStore::load_from_path(&path, "Treasury").expect("load artifact");
        std::fs::remove_file(&path).ok();

        assert_eq!(artifact.contract_name, "Treasury");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn rejects_empty_bytecode() {
        let path = write_artifact(r#"{"contractName":"IVault","bytecode":"0x"}"#);
        let err = ArtifactStore::load_from_path(&path, "IVault").unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, AppError::Validation { field, .. } if field.contains("bytecode")));
    }

    #[test]
    fn rejects_odd_length_hex() {
        let path = write_artifact(r#"{"bytecode":"0x608"}"#);
        let err = ArtifactStore::load_from_path(&path, "Broken").unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn missing_artifact_is_config_error() {
        let store = ArtifactStore::new("/nonexistent-artifacts-dir");
        let err = store.load("Vault").unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("Artifact not found")));
    }
}
