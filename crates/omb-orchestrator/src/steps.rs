//! ---
//! omb_section: "02-remote-orchestration"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Sequential step pipeline and jumpbox orchestration."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use futures::future::BoxFuture;
use thiserror::Error;
use tracing::info;

/// Deferred step body. Built lazily so at most one step borrows the
/// shared orchestrator state at a time.
pub type StepAction<'a> = Box<dyn FnOnce() -> BoxFuture<'a, anyhow::Result<()>> + Send + 'a>;

/// One named operation in a caller-ordered sequence.
pub struct Step<'a> {
    name: &'static str,
    action: StepAction<'a>,
}

impl<'a> Step<'a> {
    /// Bind a name to a deferred operation.
    pub fn new(
        name: &'static str,
        action: impl FnOnce() -> BoxFuture<'a, anyhow::Result<()>> + Send + 'a,
    ) -> Self {
        Self {
            name,
            action: Box::new(action),
        }
    }

    /// The step's name as reported on failure.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Failure of a named step, wrapping the underlying cause.
#[derive(Debug, Error)]
#[error("step {name} failed: {source}")]
pub struct StepError {
    /// Name of the step that failed.
    pub name: &'static str,
    /// The underlying failure.
    pub source: anyhow::Error,
}

/// Execute steps strictly in order, logging each step before it runs.
///
/// Stops at the first failing step; later steps are never executed. The
/// caller learns only "succeeded" or "failed at step X with cause Y";
/// there is no partial-success signal. Actions run at most once and are
/// never retried here.
pub async fn run_steps(steps: Vec<Step<'_>>) -> Result<(), StepError> {
    for step in steps {
        info!(step = step.name, "running step");
        (step.action)().await.map_err(|source| StepError {
            name: step.name,
            source,
        })?;
    }
    Ok(())
}
