//! Where the education dataset comes from.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::OnboardingConfig;
use crate::error::LoadError;

use super::model::{EducationDataset, EducationResponse};

/// Fetch collaborator. Called at most once per session.
#[async_trait]
pub trait EducationSource: Send + Sync {
    async fn fetch(&self) -> Result<EducationDataset, LoadError>;
}

/// Fetches the metadata document over HTTP.
pub struct HttpEducationSource {
    url: String,
    client: reqwest::Client,
}

impl HttpEducationSource {
    pub fn new(config: &OnboardingConfig) -> Result<Self, LoadError> {
        let url = config.metadata_url();
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LoadError::Http {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EducationSource for HttpEducationSource {
    async fn fetch(&self) -> Result<EducationDataset, LoadError> {
        debug!(url = %self.url, "Fetching education metadata");

        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LoadError::Http {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| LoadError::Http {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        let response: EducationResponse = serde_json::from_slice(&body)?;
        let dataset = response.into_dataset();

        info!(url = %self.url, cards = dataset.cards.len(), "Education metadata fetched");
        Ok(dataset)
    }
}

/// Reads the metadata document from a local file.
pub struct FileEducationSource {
    path: PathBuf,
}

impl FileEducationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EducationSource for FileEducationSource {
    async fn fetch(&self) -> Result<EducationDataset, LoadError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let response: EducationResponse = serde_json::from_slice(&raw)?;
        Ok(response.into_dataset())
    }
}

/// Pick the source the configuration asks for: a local file when
/// `dataset_file` is set, the HTTP endpoint otherwise.
pub fn source_from_config(config: &OnboardingConfig) -> Result<Arc<dyn EducationSource>, LoadError> {
    match &config.dataset_file {
        Some(path) => Ok(Arc::new(FileEducationSource::new(path.clone()))),
        None => Ok(Arc::new(HttpEducationSource::new(config)?)),
    }
}
