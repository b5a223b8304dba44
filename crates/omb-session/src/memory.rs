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
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::transport::Transport;

#[derive(Debug, Default)]
struct State {
    connect_failures_remaining: usize,
    connect_attempts: usize,
    connects: usize,
    connected: bool,
    alive: bool,
    drop_next_probe: bool,
    fail_next_exec: bool,
    exit_statuses: Vec<i32>,
    remote_output: Vec<u8>,
    wrote_output: bool,
    executed: Vec<String>,
    uploads: Vec<(PathBuf, String)>,
    fail_upload: Option<PathBuf>,
    mkdirs: Vec<String>,
}

/// Scripted in-memory transport for exercising the session and the
/// orchestrator without a network.
///
/// Clones share state, so tests keep a handle for scripting and
/// inspection while the session owns the transport itself.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransport {
    state: Arc<Mutex<State>>,
}

impl InMemoryTransport {
    /// Create a transport that connects successfully on first attempt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `n` connect attempts to fail, simulating a relay
    /// host that has not started listening yet.
    pub fn fail_next_connects(&self, n: usize) {
        self.state.lock().unwrap().connect_failures_remaining = n;
    }

    /// Script the next liveness probe to report a dropped link.
    pub fn drop_next_probe(&self) {
        self.state.lock().unwrap().drop_next_probe = true;
    }

    /// Script the next exec to fail before the command ever starts,
    /// simulating a broken exec channel.
    pub fn fail_next_exec(&self) {
        self.state.lock().unwrap().fail_next_exec = true;
    }

    /// Queue an exit status for the next executed command. Commands
    /// without a queued status exit zero.
    pub fn push_exit_status(&self, status: i32) {
        self.state.lock().unwrap().exit_statuses.push(status);
    }

    /// Bytes every executed command writes into the session sink.
    pub fn set_remote_output(&self, bytes: &[u8]) {
        self.state.lock().unwrap().remote_output = bytes.to_vec();
    }

    /// Script uploads of the given local path to fail.
    pub fn fail_upload_matching<P: AsRef<Path>>(&self, local: P) {
        self.state.lock().unwrap().fail_upload = Some(local.as_ref().to_path_buf());
    }

    /// Total connect attempts, including failed ones.
    pub fn connect_attempts(&self) -> usize {
        self.state.lock().unwrap().connect_attempts
    }

    /// Successful connects.
    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    /// Command lines executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    /// Recorded `(local, remote)` upload pairs, in order.
    pub fn uploads(&self) -> Vec<(PathBuf, String)> {
        self.state.lock().unwrap().uploads.clone()
    }

    /// Remote directories requested so far, in order.
    pub fn mkdirs(&self) -> Vec<String> {
        self.state.lock().unwrap().mkdirs.clone()
    }

    /// Whether any exec streamed output into the sink.
    pub fn wrote_output(&self) -> bool {
        self.state.lock().unwrap().wrote_output
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn connect(&mut self) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.connect_attempts += 1;
        if state.connect_failures_remaining > 0 {
            state.connect_failures_remaining -= 1;
            anyhow::bail!("connection refused");
        }
        state.connected = true;
        state.alive = true;
        state.connects += 1;
        Ok(())
    }

    async fn probe(&mut self) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.drop_next_probe {
            state.drop_next_probe = false;
            state.alive = false;
        }
        state.alive
    }

    async fn exec(&mut self, command: &str, sink: &mut (dyn Write + Send)) -> anyhow::Result<i32> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            anyhow::bail!("transport not connected");
        }
        if state.fail_next_exec {
            state.fail_next_exec = false;
            anyhow::bail!("exec channel broken");
        }
        state.executed.push(command.to_owned());
        if !state.remote_output.is_empty() {
            sink.write_all(&state.remote_output)?;
            state.wrote_output = true;
        }
        let status = if state.exit_statuses.is_empty() {
            0
        } else {
            state.exit_statuses.remove(0)
        };
        Ok(status)
    }

    async fn upload(&mut self, local: &Path, remote: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            anyhow::bail!("transport not connected");
        }
        if state.fail_upload.as_deref() == Some(local) {
            anyhow::bail!("transfer interrupted");
        }
        state.uploads.push((local.to_path_buf(), remote.to_owned()));
        Ok(())
    }

    async fn mkdir(&mut self, remote: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            anyhow::bail!("transport not connected");
        }
        state.mkdirs.push(remote.to_owned());
        Ok(())
    }

    fn endpoint(&self) -> String {
        "in-memory".to_owned()
    }
}
