//! ---
//! omb_section: "04-tile-installation"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Tile installation framework."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

use omb_common::{Config, EnvConfig};

/// Instance class used when the environment opts into a small footprint.
pub const REDUCED_INSTANCE_CLASS: &str = "micro";

/// String-wrapped property value, the shape the management plane expects
/// for every property document entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyValue {
    /// The wrapped value.
    pub value: String,
}

impl PropertyValue {
    /// Wrap a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Footprint and isolation settings for one tile job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    /// Whether the job's instances get outbound internet access.
    pub internet_connected: bool,
    /// Instance class identifier; empty means the tile default.
    pub instance_type: String,
}

impl Resource {
    /// Size a job from the environment's footprint choice. Small
    /// footprint selects the reduced instance class; otherwise the class
    /// stays unspecified and the tile default applies.
    pub fn footprint_sized(env: &EnvConfig, internet_connected: bool) -> Self {
        let instance_type = if env.small_footprint {
            REDUCED_INSTANCE_CLASS.to_owned()
        } else {
            String::new()
        };
        Self {
            internet_connected,
            instance_type,
        }
    }
}

/// Subnet reference inside a network document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkName {
    /// Subnet identifier.
    pub name: String,
}

/// Availability-zone reference inside a network document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneName {
    /// Zone identifier.
    pub name: String,
}

/// Network placement document shared by every tile: the target subnet
/// plus the environment's availability-zone layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Subnet the tile's jobs deploy into.
    pub network: NetworkName,
    /// Zones the tile's jobs may spread across.
    pub other_availability_zones: Vec<ZoneName>,
    /// Zone hosting singleton jobs.
    pub singleton_availability_zone: ZoneName,
}

impl NetworkConfig {
    /// Build the placement document for a tile targeting `subnet`.
    pub fn new(subnet: &str, cfg: &Config) -> Self {
        Self {
            network: NetworkName {
                name: subnet.to_owned(),
            },
            other_availability_zones: cfg
                .availability_zones
                .iter()
                .map(|zone| ZoneName { name: zone.clone() })
                .collect(),
            singleton_availability_zone: ZoneName {
                name: cfg.singleton_zone().to_owned(),
            },
        }
    }
}
