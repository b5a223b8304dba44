//! ---
//! omb_section: "04-tile-installation"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Tile installation framework."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
//! Tile installation framework for the OMB engine.
//!
//! Each deployable component implements [`TileInstaller`]: a static
//! [`omb_common::Tile`] definition plus a configure operation that stages
//! the product and submits three JSON documents (network, properties,
//! resources) through the narrow [`OpsManagerApi`] client seam. An
//! ordered [`registry`] drives iteration; no code switches on tile
//! identity.
#![warn(missing_docs)]

pub mod api;
pub mod director;
pub mod documents;
pub mod installer;
pub mod nozzle;
pub mod runtime;

pub use api::{ConfiguredProduct, OpsManagerApi, RecordingOpsManager};
pub use director::DirectorTile;
pub use documents::{NetworkConfig, NetworkName, PropertyValue, Resource, ZoneName};
pub use installer::{configure_all, registry, TileError, TileInstaller};
pub use nozzle::TelemetryNozzleTile;
pub use runtime::RuntimeTile;
