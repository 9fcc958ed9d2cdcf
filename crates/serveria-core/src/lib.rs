//! Serveria Core — error type, configuration, rule policy.

pub mod config;
pub mod error;

pub use config::{
    AvailabilityMode, CatalogSource, CatalogVariant, MemoryLimitMode, RulePolicy, ServeriaConfig,
};
pub use error::{Error, Result};
