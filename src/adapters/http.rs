use crate::domain::model::{MetadataRecord, MetadataRequest};
use crate::domain::ports::{ConfigProvider, MetadataCollaborator};
use crate::utils::error::{FormError, Result};
use reqwest::Client;
use std::collections::HashMap;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001/fetch-metadata";

/// 透過 HTTP POST 呼叫 metadata 服務
#[derive(Debug, Clone)]
pub struct HttpMetadataClient {
    client: Client,
    endpoint: String,
    headers: HashMap<String, String>,
}

impl HttpMetadataClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            headers: HashMap::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.endpoint()).with_headers(config.headers())
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl MetadataCollaborator for HttpMetadataClient {
    async fn fetch_metadata(&self, urls: &[String]) -> Result<Vec<MetadataRecord>> {
        tracing::debug!("Making API request to: {} ({} URLs)", self.endpoint, urls.len());

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&MetadataRequest { urls });
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(FormError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        let records: Vec<MetadataRecord> = serde_json::from_slice(&body)?;
        tracing::debug!("Received {} metadata records", records.len());

        Ok(records)
    }
}
