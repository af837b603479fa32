// LaTiS repository implementation
use crate::application::dataset_repository::{DatasetRepository, RawDataset, UpstreamFetchError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LatisRepository {
    client: reqwest::Client,
    base_url: String,
}

impl LatisRepository {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build LaTiS HTTP client")?;

        Ok(Self {
            client,
            base_url: format!("{}/", base_url.trim_end_matches('/')),
        })
    }

    fn build_url(&self, access_url: &str) -> String {
        if access_url.starts_with("http://") || access_url.starts_with("https://") {
            return access_url.to_string();
        }
        format!("{}{}", self.base_url, access_url.trim_start_matches('/'))
    }
}

/// LaTiS wraps the dataset in a single-key object named after the dataset.
fn parse_dataset_body(status: u16, body: &str) -> Result<RawDataset, UpstreamFetchError> {
    let wrapper: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(body).map_err(|e| UpstreamFetchError::malformed(status, e))?;

    let Some((name, value)) = wrapper.into_iter().next() else {
        return Err(UpstreamFetchError::malformed(status, "no dataset in response"));
    };
    let mut dataset: RawDataset =
        serde_json::from_value(value).map_err(|e| UpstreamFetchError::malformed(status, e))?;
    dataset.name = name;
    Ok(dataset)
}

#[async_trait]
impl DatasetRepository for LatisRepository {
    async fn fetch_dataset(&self, access_url: &str) -> Result<RawDataset, UpstreamFetchError> {
        let url = self.build_url(access_url);
        tracing::debug!("Fetching LaTiS dataset: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("LaTiS request to {} failed: {}", url, e);
                UpstreamFetchError::request_failed()
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            tracing::warn!("LaTiS response from {} was cut off: {}", url, e);
            UpstreamFetchError::request_failed()
        })?;

        if !(200..300).contains(&status) {
            let error = UpstreamFetchError::from_status(status, Some(body));
            tracing::warn!("LaTiS returned {} for {}: {}", status, url, error);
            return Err(error);
        }

        let dataset = parse_dataset_body(status, &body)?;
        tracing::debug!("Got {} rows of '{}' from LaTiS", dataset.data.len(), dataset.name);
        Ok(dataset)
    }
}
