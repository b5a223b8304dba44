//! ---
//! omb_section: "02-remote-orchestration"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Sequential step pipeline and jumpbox orchestration."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::info;

use omb_common::{EnvDir, UPLOADED_FILES};
use omb_session::{Session, SessionError, Transport};

use crate::payload::PayloadProducer;

/// Name under which the payload is uploaded and invoked on the jumpbox.
pub const DEFAULT_PACKAGE_NAME: &str = "ombctl";

const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(120);

/// Tunables for the jumpbox orchestrator. The defaults are the reference
/// values the rest of the system (and the test suite) assumes.
#[derive(Debug, Clone)]
pub struct JumpboxConfig {
    /// Remote name of the uploaded executable.
    pub package_name: String,
    /// Delay between reachability probes.
    pub retry_interval: Duration,
    /// Total time budget for [`Jumpbox::wait_until_started`].
    pub startup_timeout: Duration,
}

impl Default for JumpboxConfig {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_PACKAGE_NAME.to_owned(),
            retry_interval: DEFAULT_RETRY_INTERVAL,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }
}

/// Failures surfaced by jumpbox operations.
#[derive(Debug, Error)]
pub enum JumpboxError {
    /// The jumpbox never became reachable within the startup budget.
    #[error("timed out after {}s waiting for the jumpbox to accept connections", .timeout.as_secs())]
    StartupTimeout {
        /// The exhausted time budget.
        timeout: Duration,
    },
    /// Producing the deployable artifact failed.
    #[error("producing deployable payload: {source}")]
    Payload {
        /// Underlying producer failure.
        source: anyhow::Error,
    },
    /// A session operation failed; transfer errors name the local path.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Orchestrates the jumpbox bootstrap: bounded startup polling, payload
/// and configuration upload, and remote invocation of the uploaded
/// executable. Intended to be driven through the step runner in that
/// fixed order.
pub struct Jumpbox<T: Transport> {
    session: Mutex<Session<T>>,
    env_dir: EnvDir,
    config: JumpboxConfig,
    producer: Box<dyn PayloadProducer>,
}

impl<T: Transport> Jumpbox<T> {
    /// Compose a jumpbox orchestrator from its collaborators. The session
    /// stays owned by this orchestrator; operations are strictly
    /// sequential even though the step closures borrow it shared.
    pub fn new(
        session: Session<T>,
        env_dir: EnvDir,
        config: JumpboxConfig,
        producer: Box<dyn PayloadProducer>,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            env_dir,
            config,
            producer,
        }
    }

    /// Poll until the jumpbox accepts connections.
    ///
    /// The first probe fires immediately; each failed probe logs a
    /// waiting line and schedules a retry after the configured interval,
    /// bounded by a monotonic deadline. There is no external cancellation
    /// distinct from the timeout.
    pub async fn wait_until_started(&self) -> Result<(), JumpboxError> {
        let deadline = Instant::now() + self.config.startup_timeout;
        loop {
            if self.session.lock().await.ensure_connected().await.is_ok() {
                return Ok(());
            }
            info!("waiting for the jumpbox to accept connections");
            tokio::select! {
                _ = sleep_until(deadline) => {
                    return Err(JumpboxError::StartupTimeout {
                        timeout: self.config.startup_timeout,
                    });
                }
                _ = sleep(self.config.retry_interval) => {}
            }
        }
    }

    /// Upload the deployable payload, the public half of the jumpbox key
    /// pair, and the declared environment files to matching relative
    /// paths.
    ///
    /// Files are uploaded individually; the first failure aborts the
    /// operation with an error naming the local path. Nothing is rolled
    /// back; uploads are idempotent overwrites and re-running the
    /// operation is the recovery path.
    pub async fn upload_dependencies(&self) -> Result<(), JumpboxError> {
        let mut session = self.session.lock().await;
        session.ensure_connected().await?;

        let artifact = self
            .producer
            .produce()
            .map_err(|source| JumpboxError::Payload { source })?;

        let mut plan: Vec<(PathBuf, String)> = vec![
            (artifact, self.config.package_name.clone()),
            (
                self.env_dir.jumpbox_public_key(),
                EnvDir::jumpbox_public_key_remote(),
            ),
        ];
        for file in UPLOADED_FILES {
            plan.push((self.env_dir.file(file), (*file).to_owned()));
        }

        session.mkdir(EnvDir::remote_keys_dir()).await?;
        for (local, remote) in plan {
            info!(local = %local.display(), remote, "uploading dependency");
            session.upload_file(&local, &remote).await?;
        }
        Ok(())
    }

    /// Invoke the uploaded executable with the caller-supplied arguments
    /// and an environment-directory pointer at the remote working
    /// directory.
    pub async fn run_remote(&self, args: &str) -> Result<(), JumpboxError> {
        let command = format!("~/{} {} --env-dir=$PWD", self.config.package_name, args);
        let mut session = self.session.lock().await;
        session.run_command(&command).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PrebuiltPayload;
    use omb_session::InMemoryTransport;
    use std::fs;
    use std::io;

    struct Fixture {
        jumpbox: Jumpbox<InMemoryTransport>,
        transport: InMemoryTransport,
        _env: tempfile::TempDir,
        artifact: PathBuf,
    }

    fn fixture(transport: InMemoryTransport) -> Fixture {
        let env = tempfile::tempdir().expect("tempdir");
        let artifact = env.path().join("payload.bin");
        fs::write(&artifact, b"payload").unwrap();

        let session = Session::new(transport.clone(), Box::new(io::sink()));
        let jumpbox = Jumpbox::new(
            session,
            EnvDir::new(env.path()),
            JumpboxConfig::default(),
            Box::new(PrebuiltPayload::new(&artifact)),
        );
        Fixture {
            jumpbox,
            transport,
            _env: env,
            artifact,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn wait_succeeds_immediately_when_jumpbox_is_up() {
        let fixture = fixture(InMemoryTransport::new());
        let started = Instant::now();

        fixture.jumpbox.wait_until_started().await.expect("reachable");
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(fixture.transport.connect_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_retries_on_interval_until_success() {
        let transport = InMemoryTransport::new();
        transport.fail_next_connects(2);
        let fixture = fixture(transport);
        let started = Instant::now();

        fixture.jumpbox.wait_until_started().await.expect("third probe succeeds");
        // Probes at 0s, 5s, 10s; success detected without waiting out the
        // full timeout.
        assert_eq!(started.elapsed(), Duration::from_secs(10));
        assert_eq!(fixture.transport.connect_attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out_against_a_dead_jumpbox() {
        let transport = InMemoryTransport::new();
        transport.fail_next_connects(usize::MAX);
        let fixture = fixture(transport);
        let started = Instant::now();

        let err = fixture
            .jumpbox
            .wait_until_started()
            .await
            .expect_err("never reachable");
        assert!(matches!(err, JumpboxError::StartupTimeout { .. }));

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(120), "elapsed {elapsed:?}");
        assert!(
            elapsed <= Duration::from_secs(125),
            "timeout must fire within one interval of the deadline, got {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn upload_plan_covers_payload_key_and_env_files() {
        let fixture = fixture(InMemoryTransport::new());

        fixture
            .jumpbox
            .upload_dependencies()
            .await
            .expect("uploads succeed");

        assert_eq!(fixture.transport.mkdirs(), vec!["keys".to_owned()]);
        let uploads = fixture.transport.uploads();
        let remotes: Vec<&str> = uploads.iter().map(|(_, r)| r.as_str()).collect();
        assert_eq!(
            remotes,
            vec![
                "ombctl",
                "keys/jumpbox_ssh.pub",
                "env.json",
                "terraform-output.json"
            ]
        );
        assert_eq!(uploads[0].0, fixture.artifact);
    }

    #[tokio::test]
    async fn upload_failure_names_the_file_and_stops() {
        let transport = InMemoryTransport::new();
        let fixture = fixture(transport);
        let env_json = fixture.jumpbox.env_dir.file("env.json");
        fixture.transport.fail_upload_matching(&env_json);

        let err = fixture
            .jumpbox
            .upload_dependencies()
            .await
            .expect_err("env.json upload fails");
        assert!(err.to_string().contains(&env_json.display().to_string()));

        let remotes: Vec<String> = fixture
            .transport
            .uploads()
            .into_iter()
            .map(|(_, r)| r)
            .collect();
        assert_eq!(
            remotes,
            vec!["ombctl".to_owned(), "keys/jumpbox_ssh.pub".to_owned()],
            "files after the failure are not attempted"
        );
    }

    #[tokio::test]
    async fn run_remote_formats_the_invocation_line() {
        let fixture = fixture(InMemoryTransport::new());

        fixture
            .jumpbox
            .run_remote("tiles deploy")
            .await
            .expect("remote command succeeds");
        assert_eq!(
            fixture.transport.executed(),
            vec!["~/ombctl tiles deploy --env-dir=$PWD".to_owned()]
        );
    }
}
