use crate::app::render::OutputFormat;
use crate::config::toml_config::TomlConfig;
use crate::config::FormConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "url-meta-form")]
#[command(about = "Collect at least three URLs and fetch their page metadata in one batch")]
pub struct CliConfig {
    /// URLs to fill into the form, in order
    pub addresses: Vec<String>,

    /// Metadata service endpoint (overrides the config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Keep the form open and read commands from stdin
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 命令列參數優先於設定檔
    pub fn resolve(&self) -> Result<FormConfig> {
        let file = match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                file
            }
            None => TomlConfig::default(),
        };

        let addresses = if self.addresses.is_empty() {
            file.initial_addresses().to_vec()
        } else {
            self.addresses.clone()
        };

        Ok(FormConfig {
            endpoint: self
                .endpoint
                .clone()
                .unwrap_or_else(|| file.endpoint().to_string()),
            headers: file.headers(),
            addresses,
            verbose: self.verbose || file.verbose(),
            json_logs: self.json_logs || file.json_logs(),
        })
    }
}
