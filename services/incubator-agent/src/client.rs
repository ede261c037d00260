//! Inventory service API client.
//!
//! Provides methods for communicating with the inventory service:
//! - Refreshing and fetching the inventory snapshot
//! - Putting an egg into an incubator

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use hatchery_id::{ItemId, SlotId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::Config;
use crate::inventory::{IncubatorCommitter, InventorySource};
use crate::model::{InventorySnapshot, UseIncubatorResponse};

/// Body of a use-incubator request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UseIncubatorRequest {
    pub egg_id: ItemId,
}

/// Inventory service API client.
pub struct InventoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl InventoryClient {
    /// Create a new inventory client.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.inventory_url)
    }

    /// Create a client for the service at `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Failed to {}", what);
            anyhow::bail!("Failed to {}: {} - {}", what, status, body);
        }
        Ok(response)
    }
}

#[async_trait]
impl InventorySource for InventoryClient {
    async fn refresh(&self) -> Result<()> {
        let url = format!("{}/v1/inventory/refresh", self.base_url);
        debug!(url = %url, "Refreshing inventory");

        let response = self.client.post(&url).send().await?;
        Self::check(response, "refresh inventory").await?;
        Ok(())
    }

    async fn snapshot(&self) -> Result<InventorySnapshot> {
        let url = format!("{}/v1/inventory", self.base_url);
        debug!(url = %url, "Fetching inventory");

        let response = self.client.get(&url).send().await?;
        let snapshot: InventorySnapshot = Self::check(response, "fetch inventory")
            .await?
            .json()
            .await
            .context("invalid inventory response")?;

        debug!(
            incubator_count = snapshot.incubators.len(),
            egg_count = snapshot.eggs.len(),
            pokemon_count = snapshot.pokemon.len(),
            "Fetched inventory"
        );

        Ok(snapshot)
    }
}

#[async_trait]
impl IncubatorCommitter for InventoryClient {
    async fn use_incubator(
        &self,
        incubator_id: &SlotId,
        egg_id: ItemId,
    ) -> Result<UseIncubatorResponse> {
        let url = format!("{}/v1/incubators/{}/use", self.base_url, incubator_id);
        debug!(incubator_id = %incubator_id, egg_id = %egg_id, "Using incubator");

        let request = UseIncubatorRequest { egg_id };
        let response = self.client.post(&url).json(&request).send().await?;
        let payload: UseIncubatorResponse = Self::check(response, "use incubator")
            .await?
            .json()
            .await
            .context("invalid use-incubator response")?;

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = InventoryClient::with_base_url("http://inventory:8080/").unwrap();
        assert_eq!(client.base_url, "http://inventory:8080");
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_string(&UseIncubatorRequest {
            egg_id: ItemId::new(42),
        })
        .unwrap();
        assert_eq!(body, r#"{"egg_id":42}"#);
    }
}
