//! ---
//! omb_section: "04-tile-installation"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Tile installation framework."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use omb_common::Tile;

/// Narrow client seam to the management plane.
///
/// Only the two operations the tile framework needs exist here; the wire
/// protocol behind them is an external collaborator.
#[async_trait]
pub trait OpsManagerApi: Send + Sync {
    /// Register the tile for deployment ahead of configuration.
    async fn stage_product(&self, tile: &Tile) -> anyhow::Result<()>;

    /// Submit the three serialized configuration documents for a staged
    /// product.
    async fn configure_product(
        &self,
        product: &str,
        network: &str,
        properties: &str,
        resources: &str,
    ) -> anyhow::Result<()>;
}

/// One recorded configure-product submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredProduct {
    /// Product the documents were submitted for.
    pub product: String,
    /// Serialized network document.
    pub network: String,
    /// Serialized properties document.
    pub properties: String,
    /// Serialized resources document.
    pub resources: String,
}

#[derive(Debug, Default)]
struct State {
    staged: Vec<Tile>,
    configured: Vec<ConfiguredProduct>,
    fail_stage_for: Option<String>,
    fail_configure_for: Option<String>,
}

/// Recording management-plane client for tests. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingOpsManager {
    state: Arc<Mutex<State>>,
}

impl RecordingOpsManager {
    /// Client that accepts every staging and configuration call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script staging of the named product to be rejected.
    pub fn reject_staging(&self, product: impl Into<String>) {
        self.state.lock().unwrap().fail_stage_for = Some(product.into());
    }

    /// Script configuration submission for the named product to be
    /// rejected.
    pub fn reject_configuration(&self, product: impl Into<String>) {
        self.state.lock().unwrap().fail_configure_for = Some(product.into());
    }

    /// Tiles staged so far, in order.
    pub fn staged(&self) -> Vec<Tile> {
        self.state.lock().unwrap().staged.clone()
    }

    /// Configuration submissions so far, in order.
    pub fn configured(&self) -> Vec<ConfiguredProduct> {
        self.state.lock().unwrap().configured.clone()
    }
}

#[async_trait]
impl OpsManagerApi for RecordingOpsManager {
    async fn stage_product(&self, tile: &Tile) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_stage_for.as_deref() == Some(tile.name.as_str()) {
            anyhow::bail!("staging rejected for {}", tile.name);
        }
        state.staged.push(tile.clone());
        Ok(())
    }

    async fn configure_product(
        &self,
        product: &str,
        network: &str,
        properties: &str,
        resources: &str,
    ) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_configure_for.as_deref() == Some(product) {
            anyhow::bail!("configuration rejected for {product}");
        }
        state.configured.push(ConfiguredProduct {
            product: product.to_owned(),
            network: network.to_owned(),
            properties: properties.to_owned(),
            resources: resources.to_owned(),
        });
        Ok(())
    }
}
