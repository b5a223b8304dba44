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
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::transport::Transport;

/// Failures surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The initial connect or a reconnect after a failed probe did not
    /// succeed.
    #[error("unable to connect to {endpoint}: {source}")]
    Connection {
        /// Endpoint the session was targeting.
        endpoint: String,
        /// Underlying transport failure.
        source: anyhow::Error,
    },
    /// The remote command ran but returned a non-zero exit status.
    #[error("remote command `{command}` exited with status {status}")]
    RemoteExit {
        /// Command line that was executed.
        command: String,
        /// Remote exit status.
        status: i32,
    },
    /// The remote command could not be invoked at all.
    #[error("invoking remote command `{command}`: {source}")]
    RemoteInvocation {
        /// Command line that failed to start.
        command: String,
        /// Underlying transport failure.
        source: anyhow::Error,
    },
    /// A file transfer failed; the error names the local path.
    #[error("uploading {}: {source}", .local.display())]
    Transfer {
        /// Local path whose upload failed.
        local: PathBuf,
        /// Underlying transport failure.
        source: anyhow::Error,
    },
    /// Remote directory creation failed.
    #[error("creating remote directory {path}: {source}")]
    Mkdir {
        /// Remote directory path.
        path: String,
        /// Underlying transport failure.
        source: anyhow::Error,
    },
}

/// One logical connection to a remote host.
///
/// States: `Unconnected → Connected → (probe failure) → Unconnected`.
/// The liveness flag is true only if the last probe or connect attempt
/// succeeded; every public operation calls [`Session::ensure_connected`]
/// first and fails fast when the guard fails. One session, one caller,
/// sequential operations.
pub struct Session<T: Transport> {
    transport: T,
    sink: Box<dyn Write + Send>,
    alive: bool,
}

impl<T: Transport> Session<T> {
    /// Create a session over the supplied transport. `sink` receives the
    /// output of remote commands; the connection itself is established
    /// lazily on first use.
    pub fn new(transport: T, sink: Box<dyn Write + Send>) -> Self {
        Self {
            transport,
            sink,
            alive: false,
        }
    }

    /// Whether the last probe or connect attempt succeeded.
    pub fn is_connected(&self) -> bool {
        self.alive
    }

    /// Borrow the underlying transport. Used by tests to inspect the
    /// scripted transport after driving the session.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Idempotent connectivity guard.
    ///
    /// Re-validates the existing connection with a lightweight probe and
    /// reconnects when the probe fails or no connection exists yet. On
    /// failure the liveness flag stays false and a connection error names
    /// the endpoint.
    pub async fn ensure_connected(&mut self) -> Result<(), SessionError> {
        if self.alive && self.transport.probe().await {
            return Ok(());
        }
        self.alive = false;
        match self.transport.connect().await {
            Ok(()) => {
                debug!(endpoint = %self.transport.endpoint(), "session connected");
                self.alive = true;
                Ok(())
            }
            Err(source) => Err(SessionError::Connection {
                endpoint: self.transport.endpoint(),
                source,
            }),
        }
    }

    /// Execute a command line on the remote host, streaming output to the
    /// configured sink. A non-zero remote exit status is a reported
    /// failure, not a panic.
    pub async fn run_command(&mut self, command: &str) -> Result<(), SessionError> {
        self.ensure_connected().await?;
        debug!(command, "executing remote command");
        match self.transport.exec(command, self.sink.as_mut()).await {
            Ok(0) => Ok(()),
            Ok(status) => Err(SessionError::RemoteExit {
                command: command.to_owned(),
                status,
            }),
            Err(source) => {
                self.alive = false;
                Err(SessionError::RemoteInvocation {
                    command: command.to_owned(),
                    source,
                })
            }
        }
    }

    /// Copy a local file to the remote path, creating or overwriting as
    /// needed.
    pub async fn upload_file(&mut self, local: &Path, remote: &str) -> Result<(), SessionError> {
        self.ensure_connected().await?;
        debug!(local = %local.display(), remote, "uploading file");
        self.transport
            .upload(local, remote)
            .await
            .map_err(|source| SessionError::Transfer {
                local: local.to_path_buf(),
                source,
            })
    }

    /// Create a remote directory. Already-exists is not an error.
    pub async fn mkdir(&mut self, remote: &str) -> Result<(), SessionError> {
        self.ensure_connected().await?;
        self.transport
            .mkdir(remote)
            .await
            .map_err(|source| SessionError::Mkdir {
                path: remote.to_owned(),
                source,
            })
    }
}
