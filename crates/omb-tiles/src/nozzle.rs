//! ---
//! omb_section: "04-tile-installation"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Tile installation framework."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use omb_common::{Config, EnvConfig, Tile};

use crate::api::OpsManagerApi;
use crate::documents::{NetworkConfig, PropertyValue, Resource};
use crate::installer::{stage_and_configure, TileError, TileInstaller};

const PRODUCT_NAME: &str = "telemetry-nozzle";
const PRODUCT_VERSION: &str = "2.0.3";
const SKIP_SSL_VALIDATION: &str = "true";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Properties {
    #[serde(rename = ".properties.firehose_endpoint")]
    endpoint: PropertyValue,
    #[serde(rename = ".properties.firehose_skip_ssl")]
    skip_ssl_validation: PropertyValue,
    #[serde(rename = ".properties.service_account")]
    service_account: PropertyValue,
    #[serde(rename = ".properties.project_id")]
    project_id: PropertyValue,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Resources {
    #[serde(rename = "telemetry-nozzle")]
    nozzle: Resource,
}

/// Telemetry nozzle: drains the platform firehose into the cloud
/// provider's telemetry service.
#[derive(Debug, Default)]
pub struct TelemetryNozzleTile;

impl TelemetryNozzleTile {
    fn properties(cfg: &Config) -> Properties {
        Properties {
            endpoint: PropertyValue::new(format!("https://api.sys.{}", cfg.dns_suffix)),
            skip_ssl_validation: PropertyValue::new(SKIP_SSL_VALIDATION),
            service_account: PropertyValue::new(&cfg.nozzle_service_account_key),
            project_id: PropertyValue::new(&cfg.project_id),
        }
    }
}

#[async_trait]
impl TileInstaller for TelemetryNozzleTile {
    fn definition(&self, _env: &EnvConfig) -> Tile {
        Tile::new(PRODUCT_NAME, PRODUCT_VERSION)
    }

    async fn configure(
        &self,
        env: &EnvConfig,
        cfg: &Config,
        om: &dyn OpsManagerApi,
    ) -> Result<(), TileError> {
        let tile = self.definition(env);
        let network = NetworkConfig::new(&cfg.services_subnet_name, cfg);
        let properties = Self::properties(cfg);
        let resources = Resources {
            nozzle: Resource::footprint_sized(env, false),
        };
        stage_and_configure(om, &tile, &network, &properties, &resources).await
    }

    fn built_in(&self) -> bool {
        false
    }
}
