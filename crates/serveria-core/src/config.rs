//! Configuration and rule policy selection.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 3010;
pub const DEFAULT_MAX_SESSIONS: usize = 100;

/// Built-in catalog data sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogVariant {
    /// HPE and Dell chassis, memory ceilings expressed in GB.
    Enterprise,
    /// Three-chassis lineup, memory ceilings expressed as module counts.
    Classic,
}

impl CatalogVariant {
    pub fn all() -> &'static [CatalogVariant] {
        &[Self::Enterprise, Self::Classic]
    }
}

impl std::fmt::Display for CatalogVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enterprise => write!(f, "enterprise"),
            Self::Classic => write!(f, "classic"),
        }
    }
}

impl FromStr for CatalogVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "enterprise" => Ok(Self::Enterprise),
            "classic" => Ok(Self::Classic),
            other => Err(Error::Config(format!("unknown catalog variant '{}'", other))),
        }
    }
}

/// How the "available components" lists react to additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityMode {
    /// Available lists always equal the chassis compatibility lists.
    Static,
    /// Available and selected partition the compatibility list.
    Partitioned,
}

impl FromStr for AvailabilityMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "partitioned" => Ok(Self::Partitioned),
            other => Err(Error::Config(format!("unknown availability mode '{}'", other))),
        }
    }
}

/// Meaning of a chassis's `max_memory` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryLimitMode {
    /// Ceiling on summed module capacity in GB, reported as a warning.
    Capacity,
    /// Ceiling on the number of installed modules, enforced like CPU/GPU slots.
    Modules,
}

impl FromStr for MemoryLimitMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "capacity" => Ok(Self::Capacity),
            "modules" => Ok(Self::Modules),
            other => Err(Error::Config(format!("unknown memory limit mode '{}'", other))),
        }
    }
}

/// Rules applied by a configuration session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulePolicy {
    pub availability: AvailabilityMode,
    pub memory_limit: MemoryLimitMode,
    /// Refuse additions that are not on the chassis compatibility list.
    pub enforce_compatibility: bool,
}

impl RulePolicy {
    pub fn for_variant(variant: CatalogVariant) -> Self {
        match variant {
            CatalogVariant::Enterprise => Self {
                availability: AvailabilityMode::Static,
                memory_limit: MemoryLimitMode::Capacity,
                enforce_compatibility: true,
            },
            CatalogVariant::Classic => Self {
                availability: AvailabilityMode::Partitioned,
                memory_limit: MemoryLimitMode::Modules,
                enforce_compatibility: true,
            },
        }
    }
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::for_variant(CatalogVariant::Enterprise)
    }
}

/// Where the catalog data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Builtin(CatalogVariant),
    File(PathBuf),
}

/// Top-level Serveria configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeriaConfig {
    /// HTTP server port.
    pub port: u16,
    pub catalog: CatalogSource,
    pub policy: RulePolicy,
    /// Live configuration sessions kept before the oldest is evicted.
    pub max_sessions: usize,
}

impl Default for ServeriaConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            catalog: CatalogSource::Builtin(CatalogVariant::Enterprise),
            policy: RulePolicy::default(),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl ServeriaConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT '{}'", p)))?,
            None => DEFAULT_PORT,
        };

        let variant = match lookup("SERVERIA_CATALOG_VARIANT") {
            Some(v) => v.parse()?,
            None => CatalogVariant::Enterprise,
        };

        let catalog = match lookup("SERVERIA_CATALOG").filter(|p| !p.trim().is_empty()) {
            Some(path) => CatalogSource::File(PathBuf::from(path)),
            None => CatalogSource::Builtin(variant),
        };

        let mut policy = RulePolicy::for_variant(variant);
        if let Some(v) = lookup("SERVERIA_AVAILABILITY") {
            policy.availability = v.parse()?;
        }
        if let Some(v) = lookup("SERVERIA_MEMORY_LIMIT") {
            policy.memory_limit = v.parse()?;
        }
        if let Some(v) = lookup("SERVERIA_ENFORCE_COMPATIBILITY") {
            policy.enforce_compatibility = parse_bool(&v)?;
        }

        let max_sessions = match lookup("SERVERIA_MAX_SESSIONS") {
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::Config(format!(
                        "SERVERIA_MAX_SESSIONS must be a positive integer, got '{}'",
                        v
                    )))
                }
            },
            None => DEFAULT_MAX_SESSIONS,
        };

        Ok(Self {
            port,
            catalog,
            policy,
            max_sessions,
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("invalid boolean '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServeriaConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.catalog, CatalogSource::Builtin(CatalogVariant::Enterprise));
        assert_eq!(config.policy, RulePolicy::for_variant(CatalogVariant::Enterprise));
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_classic_variant_policy() {
        let config =
            ServeriaConfig::from_vars(vars(&[("SERVERIA_CATALOG_VARIANT", "classic")])).unwrap();
        assert_eq!(config.catalog, CatalogSource::Builtin(CatalogVariant::Classic));
        assert_eq!(config.policy.availability, AvailabilityMode::Partitioned);
        assert_eq!(config.policy.memory_limit, MemoryLimitMode::Modules);
    }

    #[test]
    fn test_policy_overrides() {
        let config = ServeriaConfig::from_vars(vars(&[
            ("SERVERIA_AVAILABILITY", "Partitioned"),
            ("SERVERIA_ENFORCE_COMPATIBILITY", "off"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.policy.availability, AvailabilityMode::Partitioned);
        assert_eq!(config.policy.memory_limit, MemoryLimitMode::Capacity);
        assert!(!config.policy.enforce_compatibility);
    }

    #[test]
    fn test_catalog_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let config = ServeriaConfig::from_vars(vars(&[(
            "SERVERIA_CATALOG",
            path.to_str().unwrap(),
        )]))
        .unwrap();
        assert_eq!(config.catalog, CatalogSource::File(path));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ServeriaConfig::from_vars(vars(&[("PORT", "http")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ServeriaConfig::from_vars(vars(&[("SERVERIA_MEMORY_LIMIT", "slots")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ServeriaConfig::from_vars(vars(&[("SERVERIA_MAX_SESSIONS", "0")])),
            Err(Error::Config(_))
        ));
    }
}
