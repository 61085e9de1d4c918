#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::DEFAULT_ENDPOINT;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_header_names, validate_url, Validate};
use std::collections::HashMap;

/// Settings after merging command-line flags over the optional TOML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub endpoint: String,
    pub headers: HashMap<String, String>,
    pub addresses: Vec<String>,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            headers: HashMap::new(),
            addresses: Vec::new(),
            verbose: false,
            json_logs: false,
        }
    }
}

impl ConfigProvider for FormConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn headers(&self) -> HashMap<String, String> {
        self.headers.clone()
    }

    fn initial_addresses(&self) -> &[String] {
        &self.addresses
    }
}

impl Validate for FormConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_header_names("headers", self.headers.keys())
    }
}
