//! ---
//! omb_section: "02-remote-orchestration"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Remote session lifecycle and transports."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
//! Remote session core for the OMB orchestration engine.
//!
//! The [`Session`] type owns one logical connection to a remote host and
//! re-validates liveness before every operation. The wire mechanics live
//! behind the [`Transport`] trait; production uses the SSH transport,
//! tests use the in-memory scripted transport.
#![warn(missing_docs)]

pub mod memory;
pub mod session;
pub mod ssh;
pub mod transport;

pub use memory::InMemoryTransport;
pub use session::{Session, SessionError};
pub use ssh::{SshEndpoint, SshTransport, DEFAULT_SSH_PORT};
pub use transport::Transport;
