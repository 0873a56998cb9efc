// crates/scenario-store/src/config.rs
// ============================================================================
// Module: Store Configuration
// Description: Filesystem layout knobs for the scenario and secrets stores.
// Purpose: Keep the base directory and derived paths in one place, per the
//          ambient-configuration stack named in `spec.md`'s expanded scope.
// Dependencies: std
// ============================================================================

//! ## Overview
//! `spec.md` §1 scopes configuration *loading* (reading a config file format,
//! env var precedence, CLI flags) out of this crate's concerns, but storage
//! still needs somewhere to put its files. [`StoreConfig`] is the plain
//! struct a host builds however it likes and hands in.

use std::path::Path;
use std::path::PathBuf;

/// Filesystem layout for one store instance.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// The root directory all scenario and secrets files live under.
    pub base_dir: PathBuf,
}

impl StoreConfig {
    /// Builds a config rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The directory scenario documents are stored in.
    #[must_use]
    pub fn scenarios_dir(&self) -> PathBuf {
        self.base_dir.join("scenarios")
    }

    /// The directory secret values are stored in, separate from scenarios.
    #[must_use]
    pub fn secrets_dir(&self) -> PathBuf {
        self.base_dir.join("secrets")
    }

    /// The aggregate index file path.
    #[must_use]
    pub fn index_file(&self) -> PathBuf {
        self.base_dir.join("index.json")
    }

    /// The path of one scenario's document file.
    #[must_use]
    pub fn scenario_file(&self, name: &str) -> PathBuf {
        self.scenarios_dir().join(format!("{name}.json"))
    }

    /// The path of one scenario's secrets file.
    #[must_use]
    pub fn secrets_file(&self, name: &str) -> PathBuf {
        self.secrets_dir().join(format!("{name}.secrets.json"))
    }

    /// The sentinel file that excludes the secrets directory from casual
    /// version control (`spec.md` §4.5: secrets are never committed
    /// alongside scenarios).
    #[must_use]
    pub fn secrets_excluder_file(&self) -> PathBuf {
        self.secrets_dir().join(".gitignore")
    }
}

/// Ensures `base_dir`'s `scenarios/` and `secrets/` subdirectories exist, and
/// that the secrets directory carries its version-control excluder.
///
/// # Errors
///
/// Returns any [`std::io::Error`] from directory or file creation.
pub fn ensure_layout(config: &StoreConfig) -> std::io::Result<()> {
    std::fs::create_dir_all(config.scenarios_dir())?;
    std::fs::create_dir_all(config.secrets_dir())?;
    let excluder = config.secrets_excluder_file();
    if !Path::new(&excluder).exists() {
        std::fs::write(excluder, "*\n")?;
    }
    Ok(())
}
