//! ---
//! omb_section: "15-testing-qa-runbook"
//! omb_subsection: "integration-tests"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Integration tests for the OMB remote orchestration flow."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use std::fs;
use std::io;
use std::path::PathBuf;

use futures::FutureExt;

use omb_common::EnvDir;
use omb_logging::LogSink;
use omb_orchestrator::{run_steps, Jumpbox, JumpboxConfig, PrebuiltPayload, Step};
use omb_session::{InMemoryTransport, Session};

struct Harness {
    jumpbox: Jumpbox<InMemoryTransport>,
    transport: InMemoryTransport,
    artifact: PathBuf,
    _env: tempfile::TempDir,
}

impl Harness {
    fn env_file(&self, name: &str) -> PathBuf {
        self._env.path().join(name)
    }
}

fn harness(transport: InMemoryTransport) -> Harness {
    let env = tempfile::tempdir().expect("tempdir");
    fs::create_dir(env.path().join("keys")).unwrap();
    fs::write(env.path().join("keys/jumpbox_ssh.pub"), "ssh-ed25519 AAAA").unwrap();
    fs::write(env.path().join("env.json"), r#"{"small_footprint": false}"#).unwrap();
    fs::write(env.path().join("terraform-output.json"), "{}").unwrap();
    let artifact = env.path().join("ombctl");
    fs::write(&artifact, b"payload-bits").unwrap();

    let session = Session::new(transport.clone(), Box::new(io::sink()));
    let jumpbox = Jumpbox::new(
        session,
        EnvDir::new(env.path()),
        JumpboxConfig::default(),
        Box::new(PrebuiltPayload::new(&artifact)),
    );
    Harness {
        jumpbox,
        transport,
        artifact,
        _env: env,
    }
}

fn bootstrap_steps<'a>(jumpbox: &'a Jumpbox<InMemoryTransport>, command: &'a str) -> Vec<Step<'a>> {
    vec![
        Step::new("wait-for-jumpbox", move || {
            async move { Ok(jumpbox.wait_until_started().await?) }.boxed()
        }),
        Step::new("upload-dependencies", move || {
            async move { Ok(jumpbox.upload_dependencies().await?) }.boxed()
        }),
        Step::new("run-remote-command", move || {
            async move { Ok(jumpbox.run_remote(command).await?) }.boxed()
        }),
    ]
}

#[tokio::test(start_paused = true)]
async fn full_bootstrap_flow_waits_uploads_and_invokes() {
    let transport = InMemoryTransport::new();
    transport.fail_next_connects(2);
    let harness = harness(transport);

    run_steps(bootstrap_steps(&harness.jumpbox, "tiles deploy"))
        .await
        .expect("bootstrap succeeds");

    // Two refused probes, one successful connect, and the connection is
    // reused for every subsequent operation.
    assert_eq!(harness.transport.connect_attempts(), 3);
    assert_eq!(harness.transport.connects(), 1);

    assert_eq!(harness.transport.mkdirs(), vec!["keys".to_owned()]);
    let uploads = harness.transport.uploads();
    let remotes: Vec<&str> = uploads.iter().map(|(_, remote)| remote.as_str()).collect();
    assert_eq!(
        remotes,
        vec![
            "ombctl",
            "keys/jumpbox_ssh.pub",
            "env.json",
            "terraform-output.json"
        ]
    );
    assert_eq!(uploads[0].0, harness.artifact);

    assert_eq!(
        harness.transport.executed(),
        vec!["~/ombctl tiles deploy --env-dir=$PWD".to_owned()]
    );
}

#[tokio::test(start_paused = true)]
async fn unreachable_jumpbox_fails_the_first_step_and_stops() {
    let transport = InMemoryTransport::new();
    transport.fail_next_connects(usize::MAX);
    let harness = harness(transport);

    let err = run_steps(bootstrap_steps(&harness.jumpbox, "tiles deploy"))
        .await
        .expect_err("wait step times out");
    assert_eq!(err.name, "wait-for-jumpbox");
    assert!(err.to_string().contains("timed out"));

    assert!(
        harness.transport.uploads().is_empty(),
        "upload step must never run after the wait step fails"
    );
    assert!(harness.transport.executed().is_empty());
}

#[tokio::test]
async fn quiet_logging_does_not_suppress_remote_command_output() {
    omb_logging::init(LogSink::Discard);
    let transport = InMemoryTransport::new();
    transport.set_remote_output(b"deploy ok\n");
    let harness = harness(transport);

    run_steps(bootstrap_steps(&harness.jumpbox, "tiles deploy"))
        .await
        .expect("bootstrap succeeds");

    assert!(
        harness.transport.wrote_output(),
        "the remote command's output must reach the session sink even when \
         step logging is discarded"
    );
}

#[tokio::test]
async fn failed_upload_surfaces_the_step_and_the_file() {
    let harness = harness(InMemoryTransport::new());
    let env_json = harness.env_file("env.json");
    harness.transport.fail_upload_matching(&env_json);

    let err = run_steps(bootstrap_steps(&harness.jumpbox, "tiles deploy"))
        .await
        .expect_err("upload step fails");
    assert_eq!(err.name, "upload-dependencies");
    assert!(err.to_string().contains(&env_json.display().to_string()));

    assert!(
        harness.transport.executed().is_empty(),
        "remote command must never run after an upload failure"
    );
}
