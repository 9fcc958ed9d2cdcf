//! Catalog types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serveria_core::Error;

/// Component slot category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Memory,
    Gpu,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[Self::Cpu, Self::Memory, Self::Gpu]
    }

    /// Lowercase identifier used in payloads and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Gpu => "gpu",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Memory => write!(f, "Memory"),
            Self::Gpu => write!(f, "GPU"),
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "memory" => Ok(Self::Memory),
            "gpu" => Ok(Self::Gpu),
            other => Err(Error::NotFound(format!("category '{}'", other))),
        }
    }
}

/// A single orderable part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    pub name: String,
    pub category: Category,
    /// Power draw in watts.
    pub power_w: u32,
    /// Core count (CPU only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    /// Module capacity for memory, VRAM for GPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_gb: Option<u32>,
}

impl ComponentSpec {
    pub fn cores_or_zero(&self) -> u32 {
        self.cores.unwrap_or(0)
    }

    pub fn capacity_or_zero(&self) -> u32 {
        self.capacity_gb.unwrap_or(0)
    }
}

/// A server model and its slot limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChassisSpec {
    pub name: String,
    pub max_cpu: u32,
    pub max_gpu: u32,
    /// GB ceiling or module count, depending on the memory limit rule.
    pub max_memory: u32,
    pub max_power_w: u32,
    pub compatible_cpus: Vec<String>,
    pub compatible_memory: Vec<String>,
    pub compatible_gpus: Vec<String>,
}

impl ChassisSpec {
    /// Compatibility list for a category, in catalog order.
    pub fn compatible(&self, category: Category) -> &[String] {
        match category {
            Category::Cpu => &self.compatible_cpus,
            Category::Memory => &self.compatible_memory,
            Category::Gpu => &self.compatible_gpus,
        }
    }

    pub fn is_compatible(&self, category: Category, component: &str) -> bool {
        self.compatible(category).iter().any(|c| c == component)
    }

    /// Slot count for CPU/GPU; `max_memory` for memory.
    pub fn max_for(&self, category: Category) -> u32 {
        match category {
            Category::Cpu => self.max_cpu,
            Category::Memory => self.max_memory,
            Category::Gpu => self.max_gpu,
        }
    }
}

/// On-disk catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub chassis: Vec<ChassisSpec>,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}
