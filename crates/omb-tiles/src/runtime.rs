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

const PRODUCT_NAME: &str = "platform-runtime";
const SMALL_PRODUCT_NAME: &str = "platform-runtime-small";
const PRODUCT_VERSION: &str = "4.1.0";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Properties {
    #[serde(rename = ".properties.system_domain")]
    system_domain: PropertyValue,
    #[serde(rename = ".properties.apps_domain")]
    apps_domain: PropertyValue,
    #[serde(rename = ".properties.skip_cert_verify")]
    skip_cert_verify: PropertyValue,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct Resources {
    #[serde(rename = "router")]
    router: Resource,
}

/// Application runtime: the workload-hosting layer of the platform. The
/// environment's footprint choice selects between the full product and
/// its reduced-footprint sibling.
#[derive(Debug, Default)]
pub struct RuntimeTile;

#[async_trait]
impl TileInstaller for RuntimeTile {
    fn definition(&self, env: &EnvConfig) -> Tile {
        let name = if env.small_footprint {
            SMALL_PRODUCT_NAME
        } else {
            PRODUCT_NAME
        };
        Tile::new(name, PRODUCT_VERSION)
    }

    async fn configure(
        &self,
        env: &EnvConfig,
        cfg: &Config,
        om: &dyn OpsManagerApi,
    ) -> Result<(), TileError> {
        let tile = self.definition(env);
        let network = NetworkConfig::new(&cfg.services_subnet_name, cfg);
        let properties = Properties {
            system_domain: PropertyValue::new(format!("sys.{}", cfg.dns_suffix)),
            apps_domain: PropertyValue::new(format!("apps.{}", cfg.dns_suffix)),
            skip_cert_verify: PropertyValue::new("true"),
        };
        // The router fronts ingress traffic and keeps internet access in
        // every footprint.
        let resources = Resources {
            router: Resource::footprint_sized(env, true),
        };
        stage_and_configure(om, &tile, &network, &properties, &resources).await
    }

    fn built_in(&self) -> bool {
        false
    }
}
