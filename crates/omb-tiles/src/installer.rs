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
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use omb_common::{Config, EnvConfig, Tile};

use crate::api::OpsManagerApi;
use crate::documents::NetworkConfig;

/// Failures surfaced by tile configuration.
#[derive(Debug, Error)]
pub enum TileError {
    /// A configuration document failed to encode.
    #[error("serializing {document} document for {product}: {source}")]
    Serialization {
        /// Product whose document failed to encode.
        product: String,
        /// Which of the three documents failed.
        document: &'static str,
        /// Underlying encoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The management plane rejected staging.
    #[error("staging {product}: {source}")]
    Staging {
        /// Product that failed to stage.
        product: String,
        /// Underlying client failure.
        source: anyhow::Error,
    },
    /// The management plane rejected the configuration submission.
    #[error("submitting configuration for {product}: {source}")]
    Submission {
        /// Product whose configuration was rejected.
        product: String,
        /// Underlying client failure.
        source: anyhow::Error,
    },
}

/// Capability set implemented once per deployable component.
///
/// Implementations are stateless beyond their static metadata; every
/// `configure` call is independent and shares no mutable state with
/// other tiles.
#[async_trait]
pub trait TileInstaller: Send + Sync {
    /// The component's static identity given environment sizing choices.
    fn definition(&self, env: &EnvConfig) -> Tile;

    /// Stage the product and submit its three configuration documents.
    /// Failures propagate unmodified; nothing is retried or partially
    /// applied.
    async fn configure(
        &self,
        env: &EnvConfig,
        cfg: &Config,
        om: &dyn OpsManagerApi,
    ) -> Result<(), TileError>;

    /// Whether the component ships pre-installed in the management plane.
    fn built_in(&self) -> bool;
}

/// Stage a tile and submit its three serialized documents.
///
/// The shared spine of every installer's `configure`: variants differ
/// only in their document contents.
pub(crate) async fn stage_and_configure<P, R>(
    om: &dyn OpsManagerApi,
    tile: &Tile,
    network: &NetworkConfig,
    properties: &P,
    resources: &R,
) -> Result<(), TileError>
where
    P: Serialize + Sync,
    R: Serialize + Sync,
{
    om.stage_product(tile)
        .await
        .map_err(|source| TileError::Staging {
            product: tile.name.clone(),
            source,
        })?;

    let network = encode(&tile.name, "network", network)?;
    let properties = encode(&tile.name, "properties", properties)?;
    let resources = encode(&tile.name, "resources", resources)?;

    om.configure_product(&tile.name, &network, &properties, &resources)
        .await
        .map_err(|source| TileError::Submission {
            product: tile.name.clone(),
            source,
        })
}

fn encode<D: Serialize>(
    product: &str,
    document: &'static str,
    value: &D,
) -> Result<String, TileError> {
    serde_json::to_string(value).map_err(|source| TileError::Serialization {
        product: product.to_owned(),
        document,
        source,
    })
}

/// Ordered tile registry: infrastructure first, workloads after. The
/// order is the one `configure_all` applies.
pub fn registry() -> Vec<Box<dyn TileInstaller>> {
    vec![
        Box::new(crate::director::DirectorTile),
        Box::new(crate::runtime::RuntimeTile),
        Box::new(crate::nozzle::TelemetryNozzleTile),
    ]
}

/// Configure every registered tile in registry order, stopping at the
/// first failure.
pub async fn configure_all(
    env: &EnvConfig,
    cfg: &Config,
    om: &dyn OpsManagerApi,
    tiles: &[Box<dyn TileInstaller>],
) -> Result<(), TileError> {
    for tile in tiles {
        let definition = tile.definition(env);
        info!(
            product = %definition.name,
            version = %definition.version,
            built_in = tile.built_in(),
            "configuring tile"
        );
        tile.configure(env, cfg, om).await?;
    }
    Ok(())
}
