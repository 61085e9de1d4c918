use crate::adapters::http::DEFAULT_ENDPOINT;
use crate::core::ConfigProvider;
use crate::utils::error::{FormError, Result};
use crate::utils::validation::{validate_header_names, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub collaborator: CollaboratorConfig,
    #[serde(default)]
    pub form: FormSection,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub headers: Option<HashMap<String, String>>,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            headers: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSection {
    #[serde(default)]
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FormError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FormError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| FormError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.collaborator.endpoint
    }

    fn headers(&self) -> HashMap<String, String> {
        self.collaborator.headers.clone().unwrap_or_default()
    }

    fn initial_addresses(&self) -> &[String] {
        &self.form.addresses
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("collaborator.endpoint", &self.collaborator.endpoint)?;
        if let Some(headers) = &self.collaborator.headers {
            validate_header_names("collaborator.headers", headers.keys())?;
        }
        Ok(())
    }
}
