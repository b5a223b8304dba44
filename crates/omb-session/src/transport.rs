//! ---
//! omb_section: "02-remote-orchestration"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Remote session lifecycle and transports."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use std::io::Write;
use std::path::Path;

use async_trait::async_trait;

/// Wire-level operations against a remote host.
///
/// Implementations hold the connection handle; [`crate::Session`] layers
/// the liveness state machine on top and never touches the wire directly.
#[async_trait]
pub trait Transport: Send {
    /// Establish the underlying connection, replacing any existing one.
    async fn connect(&mut self) -> anyhow::Result<()>;

    /// Lightweight liveness probe against the existing connection.
    /// Returns `false` when no connection exists or the link has dropped.
    async fn probe(&mut self) -> bool;

    /// Execute a command line remotely, streaming combined output into
    /// `sink`. Returns the remote exit status.
    async fn exec(&mut self, command: &str, sink: &mut (dyn Write + Send)) -> anyhow::Result<i32>;

    /// Copy a local file's bytes to the remote path, creating or
    /// overwriting the destination.
    async fn upload(&mut self, local: &Path, remote: &str) -> anyhow::Result<()>;

    /// Create a remote directory. Already-exists is not an error.
    async fn mkdir(&mut self, remote: &str) -> anyhow::Result<()>;

    /// Human-readable endpoint description for error reporting.
    fn endpoint(&self) -> String;
}
