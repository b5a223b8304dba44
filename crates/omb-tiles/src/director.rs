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

const PRODUCT_NAME: &str = "director";
// Built-in products carry the management plane's bundled version.
const PRODUCT_VERSION: &str = "bundled";
const METADATA_NTP_SERVER: &str = "169.254.169.254";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Properties {
    #[serde(rename = ".properties.ntp_servers")]
    ntp_servers: PropertyValue,
    #[serde(rename = ".properties.director_hostname")]
    director_hostname: PropertyValue,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Resources {
    #[serde(rename = "director")]
    director: Resource,
}

/// Deployment director: ships pre-installed in the management plane, so
/// no separate import step is needed upstream; configuration still flows
/// through the uniform stage-and-submit contract.
#[derive(Debug, Default)]
pub struct DirectorTile;

#[async_trait]
impl TileInstaller for DirectorTile {
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
        let network = NetworkConfig::new(&cfg.management_subnet_name, cfg);
        let properties = Properties {
            ntp_servers: PropertyValue::new(METADATA_NTP_SERVER),
            director_hostname: PropertyValue::new(format!("opsman.{}", cfg.dns_suffix)),
        };
        let resources = Resources {
            director: Resource::footprint_sized(env, false),
        };
        stage_and_configure(om, &tile, &network, &properties, &resources).await
    }

    fn built_in(&self) -> bool {
        true
    }
}
