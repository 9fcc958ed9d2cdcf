//! Read-only chassis and component lookup.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Serialize;
use serveria_core::{CatalogSource, CatalogVariant, Error, Result};
use tracing::{debug, info};

use crate::types::{CatalogFile, Category, ChassisSpec, ComponentSpec};

const ENTERPRISE_JSON: &str = include_str!("../catalogs/enterprise.json");
const CLASSIC_JSON: &str = include_str!("../catalogs/classic.json");

/// Immutable catalog of chassis and components.
///
/// Construction runs [`Catalog::validate`], so every name on a compatibility
/// list resolves to a component of the matching category.
#[derive(Debug, Clone)]
pub struct Catalog {
    chassis: Vec<ChassisSpec>,
    components: Vec<ComponentSpec>,
    chassis_index: HashMap<String, usize>,
    component_index: HashMap<String, usize>,
}

/// Counts reported by the stats endpoint and the `validate` command.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub chassis: usize,
    pub cpus: usize,
    pub memory: usize,
    pub gpus: usize,
}

impl Catalog {
    /// Build a catalog from a parsed document, rejecting inconsistent data.
    pub fn new(file: CatalogFile) -> Result<Self> {
        let mut chassis_index = HashMap::with_capacity(file.chassis.len());
        for (i, chassis) in file.chassis.iter().enumerate() {
            if chassis_index.insert(chassis.name.clone(), i).is_some() {
                return Err(Error::Catalog(format!(
                    "duplicate chassis '{}'",
                    chassis.name
                )));
            }
        }

        let mut component_index = HashMap::with_capacity(file.components.len());
        for (i, component) in file.components.iter().enumerate() {
            if component_index.insert(component.name.clone(), i).is_some() {
                return Err(Error::Catalog(format!(
                    "duplicate component '{}'",
                    component.name
                )));
            }
        }

        let catalog = Self {
            chassis: file.chassis,
            components: file.components,
            chassis_index,
            component_index,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a JSON catalog document.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded catalog from {} ({} chassis, {} components)",
            path.display(),
            catalog.chassis.len(),
            catalog.components.len()
        );
        Ok(catalog)
    }

    /// One of the catalogs shipped with the crate.
    pub fn builtin(variant: CatalogVariant) -> Result<Self> {
        let json = match variant {
            CatalogVariant::Enterprise => ENTERPRISE_JSON,
            CatalogVariant::Classic => CLASSIC_JSON,
        };
        debug!("Using built-in {} catalog", variant);
        Self::from_json(json)
    }

    pub fn from_source(source: &CatalogSource) -> Result<Self> {
        match source {
            CatalogSource::Builtin(variant) => Self::builtin(*variant),
            CatalogSource::File(path) => Self::load(path),
        }
    }

    /// Check referential integrity and required attributes.
    ///
    /// Power, cores and capacity must be positive, and a compatibility list
    /// names each component at most once.
    pub fn validate(&self) -> Result<()> {
        for component in &self.components {
            if component.power_w == 0 {
                return Err(Error::Catalog(format!(
                    "{} '{}' has zero power draw",
                    component.category, component.name
                )));
            }
            if component.cores == Some(0) || component.capacity_gb == Some(0) {
                return Err(Error::Catalog(format!(
                    "{} '{}' has a zero core count or capacity",
                    component.category, component.name
                )));
            }
            match component.category {
                Category::Cpu if component.cores.is_none() => {
                    return Err(Error::Catalog(format!(
                        "CPU '{}' has no core count",
                        component.name
                    )));
                }
                Category::Memory | Category::Gpu if component.capacity_gb.is_none() => {
                    return Err(Error::Catalog(format!(
                        "{} '{}' has no capacity",
                        component.category, component.name
                    )));
                }
                _ => {}
            }
        }

        for chassis in &self.chassis {
            if chassis.max_power_w == 0 {
                return Err(Error::Catalog(format!(
                    "chassis '{}' has a zero power ceiling",
                    chassis.name
                )));
            }
            for &category in Category::all() {
                let mut seen = HashSet::new();
                for name in chassis.compatible(category) {
                    if !seen.insert(name.as_str()) {
                        return Err(Error::Catalog(format!(
                            "chassis '{}' lists {} '{}' twice",
                            chassis.name, category, name
                        )));
                    }
                    let component = self.component_spec(name).ok_or_else(|| {
                        Error::Catalog(format!(
                            "chassis '{}' lists unknown component '{}'",
                            chassis.name, name
                        ))
                    })?;
                    if component.category != category {
                        return Err(Error::Catalog(format!(
                            "chassis '{}' lists {} '{}' as {}",
                            chassis.name, component.category, name, category
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn chassis_spec(&self, name: &str) -> Option<&ChassisSpec> {
        self.chassis_index.get(name).map(|&i| &self.chassis[i])
    }

    pub fn component_spec(&self, name: &str) -> Option<&ComponentSpec> {
        self.component_index.get(name).map(|&i| &self.components[i])
    }

    /// All chassis in declaration order.
    pub fn chassis(&self) -> &[ChassisSpec] {
        &self.chassis
    }

    pub fn chassis_names(&self) -> Vec<&str> {
        self.chassis.iter().map(|c| c.name.as_str()).collect()
    }

    /// Chassis whose name starts with a vendor prefix (e.g. "HPE", "Dell").
    pub fn chassis_by_vendor(&self, prefix: &str) -> Vec<&ChassisSpec> {
        self.chassis
            .iter()
            .filter(|c| c.name.starts_with(prefix))
            .collect()
    }

    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    /// Compatibility list for a chassis; empty for unknown chassis.
    pub fn compatible(&self, chassis: &str, category: Category) -> &[String] {
        self.chassis_spec(chassis)
            .map(|c| c.compatible(category))
            .unwrap_or(&[])
    }

    pub fn summary(&self) -> CatalogSummary {
        let count = |category| {
            self.components
                .iter()
                .filter(|c| c.category == category)
                .count()
        };
        CatalogSummary {
            chassis: self.chassis.len(),
            cpus: count(Category::Cpu),
            memory: count(Category::Memory),
            gpus: count(Category::Gpu),
        }
    }
}
