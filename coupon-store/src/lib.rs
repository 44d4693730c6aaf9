pub mod app_config;
pub mod identity_store;

pub use app_config::{BusinessRules, Config};
pub use identity_store::IdentityFile;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Identity file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Identity file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Invalid seed configuration: {0}")]
    Seed(#[from] coupon_registry::SeedError),
}

pub type StoreResult<T> = Result<T, StoreError>;
