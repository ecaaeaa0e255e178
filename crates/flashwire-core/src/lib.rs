//! Shared domain types and configuration for flashwire.
//!
//! Defines the raw [`NewsItem`], the classification vocabulary
//! ([`Attribute`], [`FactCategory`], [`OpinionCategory`], [`Classification`]),
//! the financial-impact types, the record lifecycle ([`ProcessingStage`]),
//! content fingerprinting, and the env-based [`AppConfig`].

pub mod app_config;
pub mod config;
pub mod fingerprint;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use fingerprint::content_fingerprint;
pub use types::{
    Attribute, Classification, FactCategory, FinancialImpact, ImpactStrength, NewsItem,
    OpinionCategory, ProcessingStage,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
