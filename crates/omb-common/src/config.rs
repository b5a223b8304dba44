//! ---
//! omb_section: "01-core-functionality"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Shared configuration primitives for the OMB workspace."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

fn default_tile_version() -> String {
    "latest".to_owned()
}

/// Network and identity configuration extracted from the infrastructure
/// provisioning run. The values arrive pre-parsed in the environment
/// directory; this crate only reads the extracted JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Public address of the jumpbox fronting the management plane.
    pub jumpbox_ip: String,
    /// Cloud project the deployment lives in.
    pub project_id: String,
    /// DNS suffix under which the platform domains are registered.
    pub dns_suffix: String,
    /// Subnet reserved for the management plane itself.
    pub management_subnet_name: String,
    /// Subnet reserved for deployed service tiles.
    pub services_subnet_name: String,
    /// Availability zones available to tile jobs. The first entry doubles
    /// as the singleton zone.
    pub availability_zones: Vec<String>,
    /// Service-account key granted to the telemetry nozzle.
    pub nozzle_service_account_key: String,
}

impl Config {
    /// Zone hosting singleton jobs. Falls back to an empty identifier when
    /// the provisioning run declared no zones.
    pub fn singleton_zone(&self) -> &str {
        self.availability_zones
            .first()
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Operator-chosen sizing and feature selection for the environment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EnvConfig {
    /// Collapse tile footprints onto reduced instance classes.
    #[serde(default)]
    pub small_footprint: bool,
}

/// Identity of a deployable component as known to the management plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tile {
    /// Product name registered with the management plane.
    pub name: String,
    /// Product version to stage and configure.
    #[serde(default = "default_tile_version")]
    pub version: String,
}

impl Tile {
    /// Construct a tile identity from its product coordinates.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}
