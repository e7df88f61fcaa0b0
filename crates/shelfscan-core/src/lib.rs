//! Shared domain types for shelfscan: the page and product data model, the
//! closed retailer registry, and run/application configuration.

pub mod app_config;
pub mod config;
pub mod products;
pub mod retailer;
pub mod run_config;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{ProductField, ProductRecord, RawPage};
pub use retailer::{market_country_for_domain, RetailerFamily, RetailerId, RetailerProfile};
pub use run_config::{RunConfig, DEFAULT_MAX_PAGES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported retailer \"{0}\"; expected one of: {supported}", supported = RetailerId::supported_list())]
    UnsupportedRetailer(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid run configuration: {0}")]
    Validation(String),
}
