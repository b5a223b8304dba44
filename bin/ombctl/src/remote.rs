//! ---
//! omb_section: "05-networking-external-interfaces"
//! omb_subsection: "binary"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Control CLI for operators bootstrapping OMB deployments."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use futures::FutureExt;
use tokio::runtime::Runtime;

use omb_common::EnvDir;
use omb_logging::LogSink;
use omb_orchestrator::{run_steps, CurrentExePayload, Jumpbox, JumpboxConfig, Step};
use omb_session::{Session, SshEndpoint, SshTransport};

const JUMPBOX_USERNAME: &str = "omb";

/// Execute an ombctl command on the jumpbox.
#[derive(Debug, Args)]
pub struct RemoteCommand {
    /// Command and arguments to execute on the far side.
    #[arg(value_name = "COMMAND", required = true)]
    pub command: String,

    /// Environment directory produced by provisioning.
    #[arg(long = "env-dir", value_name = "DIR", env = "OMB_ENV_DIR")]
    pub env_dir: PathBuf,

    /// Suppress step and progress logging.
    #[arg(long, action = ArgAction::SetTrue)]
    pub quiet: bool,
}

/// Entry point for `ombctl remote`.
pub fn run(cmd: RemoteCommand) -> Result<()> {
    omb_logging::init(LogSink::from_quiet(cmd.quiet));
    let runtime = Runtime::new()?;
    runtime.block_on(execute(cmd))
}

async fn execute(cmd: RemoteCommand) -> Result<()> {
    let env_dir = EnvDir::new(&cmd.env_dir);
    let cfg = env_dir
        .config()
        .context("loading environment configuration")?;
    let key = env_dir
        .jumpbox_key_material()
        .context("loading jumpbox key material")?;

    let endpoint = SshEndpoint::new(cfg.jumpbox_ip.clone(), JUMPBOX_USERNAME, key);
    // The remote command's own output always reaches the operator; --quiet
    // only suppresses step and progress logging.
    let session = Session::new(SshTransport::new(endpoint), Box::new(io::stdout()));
    let jumpbox = Jumpbox::new(
        session,
        env_dir,
        JumpboxConfig::default(),
        Box::new(CurrentExePayload),
    );

    let command = cmd.command;
    run_steps(vec![
        Step::new("wait-for-jumpbox", || {
            async { Ok(jumpbox.wait_until_started().await?) }.boxed()
        }),
        Step::new("upload-dependencies", || {
            async { Ok(jumpbox.upload_dependencies().await?) }.boxed()
        }),
        Step::new("run-remote-command", || {
            async { Ok(jumpbox.run_remote(&command).await?) }.boxed()
        }),
    ])
    .await?;
    Ok(())
}
