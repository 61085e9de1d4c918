pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::http::HttpMetadataClient;
pub use config::FormConfig;
pub use crate::core::{
    address_list::AddressList,
    controller::{update, FormState, Msg},
    engine::FormEngine,
    view::FormView,
};
pub use domain::model::{MetadataRecord, ResultItem};
pub use utils::error::{FormError, Result};
