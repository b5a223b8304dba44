//! ---
//! omb_section: "02-remote-orchestration"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Sequential step pipeline and jumpbox orchestration."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;

/// Produces the deployable artifact uploaded to the jumpbox.
///
/// The engine only needs the resulting artifact path; how it was built is
/// not its concern, which keeps the orchestrator testable without any
/// build toolchain.
pub trait PayloadProducer: Send + Sync {
    /// Yield the path of the artifact to upload.
    fn produce(&self) -> anyhow::Result<PathBuf>;
}

/// Uploads the currently running executable. The CLI invokes itself on
/// the far side, so the running binary is the payload.
#[derive(Debug, Default)]
pub struct CurrentExePayload;

impl PayloadProducer for CurrentExePayload {
    fn produce(&self) -> anyhow::Result<PathBuf> {
        env::current_exe().context("locating the running executable")
    }
}

/// Uploads a pre-built artifact from a fixed path.
#[derive(Debug, Clone)]
pub struct PrebuiltPayload {
    path: PathBuf,
}

impl PrebuiltPayload {
    /// Reference an artifact that already exists on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PayloadProducer for PrebuiltPayload {
    fn produce(&self) -> anyhow::Result<PathBuf> {
        fs::metadata(&self.path)
            .with_context(|| format!("payload artifact missing at {}", self.path.display()))?;
        Ok(self.path.clone())
    }
}
