//! ---
//! omb_section: "01-core-functionality"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Shared configuration primitives for the OMB workspace."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{Config, EnvConfig};

/// Extracted infrastructure output consumed by the engine.
pub const TERRAFORM_OUTPUT_FILE: &str = "terraform-output.json";
/// Operator-supplied environment sizing configuration.
pub const ENV_CONFIG_FILE: &str = "env.json";
/// Files replicated verbatim onto the jumpbox at matching relative paths.
pub const UPLOADED_FILES: &[&str] = &[ENV_CONFIG_FILE, TERRAFORM_OUTPUT_FILE];

const KEYS_DIR: &str = "keys";
const JUMPBOX_KEY: &str = "jumpbox_ssh";
const JUMPBOX_PUBLIC_KEY: &str = "jumpbox_ssh.pub";

/// Read-only view over an environment directory.
///
/// The directory is produced by the provisioning tooling and holds the
/// extracted infrastructure output, the environment sizing choices, and
/// the jumpbox key material under `keys/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvDir {
    root: PathBuf,
}

impl EnvDir {
    /// Wrap an existing environment directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root path of the environment directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a file declared relative to the environment root.
    pub fn file(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Private half of the jumpbox key pair.
    pub fn jumpbox_key(&self) -> PathBuf {
        self.root.join(KEYS_DIR).join(JUMPBOX_KEY)
    }

    /// Public half of the jumpbox key pair, uploaded alongside the payload.
    pub fn jumpbox_public_key(&self) -> PathBuf {
        self.root.join(KEYS_DIR).join(JUMPBOX_PUBLIC_KEY)
    }

    /// Remote-relative destination for the public key upload.
    pub fn jumpbox_public_key_remote() -> String {
        format!("{KEYS_DIR}/{JUMPBOX_PUBLIC_KEY}")
    }

    /// Remote directory that must exist before key material is uploaded.
    pub fn remote_keys_dir() -> &'static str {
        KEYS_DIR
    }

    /// Load the extracted infrastructure configuration.
    pub fn config(&self) -> Result<Config> {
        let path = self.file(TERRAFORM_OUTPUT_FILE);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading infrastructure output {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing infrastructure output {}", path.display()))
    }

    /// Load the environment sizing configuration.
    pub fn env_config(&self) -> Result<EnvConfig> {
        let path = self.file(ENV_CONFIG_FILE);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading environment config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing environment config {}", path.display()))
    }

    /// Read the private jumpbox key into memory.
    pub fn jumpbox_key_material(&self) -> Result<String> {
        let path = self.jumpbox_key();
        fs::read_to_string(&path)
            .with_context(|| format!("reading jumpbox key {}", path.display()))
    }
}
