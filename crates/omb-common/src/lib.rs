//! ---
//! omb_section: "01-core-functionality"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Shared configuration primitives for the OMB workspace."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
//! Shared configuration primitives for the OMB workspace.
//! This crate exposes the environment directory layout and the
//! configuration structures consumed by the orchestration engine and the
//! tile installation framework.
#![warn(missing_docs)]

pub mod config;
pub mod envdir;

pub use config::{Config, EnvConfig, Tile};
pub use envdir::{EnvDir, ENV_CONFIG_FILE, TERRAFORM_OUTPUT_FILE, UPLOADED_FILES};
