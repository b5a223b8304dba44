//! ---
//! omb_section: "02-remote-orchestration"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Remote session lifecycle and transports."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use std::fs;
use std::io::{self, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;

use crate::transport::Transport;

/// Default SSH port for jumpbox connections.
pub const DEFAULT_SSH_PORT: u16 = 22;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const KEEPALIVE_INTERVAL_SECS: u32 = 15;

/// Address and identity used to reach the jumpbox over SSH.
#[derive(Debug, Clone)]
pub struct SshEndpoint {
    /// Hostname or address of the jumpbox.
    pub host: String,
    /// TCP port the SSH daemon listens on.
    pub port: u16,
    /// Principal to authenticate as.
    pub username: String,
    /// Private key material, PEM-encoded, held in memory.
    pub private_key: String,
}

impl SshEndpoint {
    /// Endpoint on the default SSH port.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: username.into(),
            private_key: private_key.into(),
        }
    }

    /// Override the SSH port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Production transport speaking SSH via `libssh2`.
///
/// The calls are blocking; the engine runs one logical thread of control
/// per command invocation, so they execute inline.
pub struct SshTransport {
    endpoint: SshEndpoint,
    session: Option<ssh2::Session>,
}

impl SshTransport {
    /// Create an unconnected transport for the given endpoint.
    pub fn new(endpoint: SshEndpoint) -> Self {
        Self {
            endpoint,
            session: None,
        }
    }

    fn active(&self) -> anyhow::Result<&ssh2::Session> {
        self.session
            .as_ref()
            .ok_or_else(|| anyhow!("no active connection to {}", self.endpoint.address()))
    }
}

#[async_trait]
impl Transport for SshTransport {
    async fn connect(&mut self) -> anyhow::Result<()> {
        self.session = None;
        let address = self.endpoint.address();
        let addr = address
            .to_socket_addrs()
            .with_context(|| format!("resolving {address}"))?
            .next()
            .ok_or_else(|| anyhow!("no address resolved for {address}"))?;
        let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
            .with_context(|| format!("establishing TCP connection to {address}"))?;

        let mut session = ssh2::Session::new().context("allocating SSH session")?;
        session.set_tcp_stream(stream);
        session
            .handshake()
            .with_context(|| format!("SSH handshake with {address}"))?;
        session
            .userauth_pubkey_memory(
                &self.endpoint.username,
                None,
                &self.endpoint.private_key,
                None,
            )
            .with_context(|| format!("authenticating as {}", self.endpoint.username))?;
        if !session.authenticated() {
            return Err(anyhow!("authentication rejected for {}", self.endpoint.username));
        }
        session.set_keepalive(true, KEEPALIVE_INTERVAL_SECS);
        self.session = Some(session);
        Ok(())
    }

    async fn probe(&mut self) -> bool {
        match &self.session {
            Some(session) => session.keepalive_send().is_ok(),
            None => false,
        }
    }

    async fn exec(&mut self, command: &str, sink: &mut (dyn Write + Send)) -> anyhow::Result<i32> {
        let session = self.active()?;
        let mut channel = session.channel_session().context("opening exec channel")?;
        // Merge stderr into the stdout stream so one drain loop interleaves
        // both; draining them sequentially can stall on a full channel
        // window when stderr fills up while stdout stays open.
        channel
            .handle_extended_data(ssh2::ExtendedData::Merge)
            .context("merging remote output streams")?;
        channel
            .exec(command)
            .with_context(|| format!("starting remote command `{command}`"))?;
        io::copy(&mut channel, sink).context("streaming remote output")?;
        channel.wait_close().context("closing exec channel")?;
        Ok(channel.exit_status()?)
    }

    async fn upload(&mut self, local: &Path, remote: &str) -> anyhow::Result<()> {
        let session = self.active()?;
        let sftp = session.sftp().context("opening sftp subsystem")?;
        let mut source =
            fs::File::open(local).with_context(|| format!("opening {}", local.display()))?;
        let mut destination = sftp
            .create(Path::new(remote))
            .with_context(|| format!("creating remote file {remote}"))?;
        io::copy(&mut source, &mut destination)
            .with_context(|| format!("copying {} to {remote}", local.display()))?;
        Ok(())
    }

    async fn mkdir(&mut self, remote: &str) -> anyhow::Result<()> {
        let session = self.active()?;
        let sftp = session.sftp().context("opening sftp subsystem")?;
        let path = Path::new(remote);
        if sftp.stat(path).is_ok() {
            return Ok(());
        }
        sftp.mkdir(path, 0o755)
            .with_context(|| format!("creating remote directory {remote}"))
    }

    fn endpoint(&self) -> String {
        self.endpoint.address()
    }
}
