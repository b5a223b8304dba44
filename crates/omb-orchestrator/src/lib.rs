//! ---
//! omb_section: "02-remote-orchestration"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Sequential step pipeline and jumpbox orchestration."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
//! Jumpbox orchestration for the OMB engine.
//!
//! [`run_steps`] drives an ordered, fail-fast sequence of named
//! operations; [`Jumpbox`] composes a session into the three operations
//! the `remote` command chains together: wait until the relay host is
//! reachable, upload the deployable payload and its companion files, and
//! invoke the uploaded executable.
#![warn(missing_docs)]

pub mod jumpbox;
pub mod payload;
pub mod steps;

pub use jumpbox::{Jumpbox, JumpboxConfig, JumpboxError, DEFAULT_PACKAGE_NAME};
pub use payload::{CurrentExePayload, PayloadProducer, PrebuiltPayload};
pub use steps::{run_steps, Step, StepError};
