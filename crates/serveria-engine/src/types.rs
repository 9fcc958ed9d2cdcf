//! Engine types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serveria_catalog::Category;
use serveria_core::RulePolicy;

/// Component names per category, in insertion order.
///
/// Used both for the selection and for the "available components" view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLists {
    pub cpu: Vec<String>,
    pub memory: Vec<String>,
    pub gpu: Vec<String>,
}

impl ComponentLists {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Cpu => &self.cpu,
            Category::Memory => &self.memory,
            Category::Gpu => &self.gpu,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Cpu => &mut self.cpu,
            Category::Memory => &mut self.memory,
            Category::Gpu => &mut self.gpu,
        }
    }

    pub fn len(&self) -> usize {
        self.cpu.len() + self.memory.len() + self.gpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.cpu.clear();
        self.memory.clear();
        self.gpu.clear();
    }

    /// Every name across all categories, CPU first.
    pub fn iter_all(&self) -> impl Iterator<Item = &String> {
        self.cpu.iter().chain(self.memory.iter()).chain(self.gpu.iter())
    }
}

/// Aggregates derived from the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub power_w: u32,
    pub memory_gb: u32,
    pub cores: u32,
}

/// Threshold violation reported for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    PowerExceeded {
        #[serde(rename = "maxPowerW")]
        max_power_w: u32,
    },
    MemoryExceeded {
        #[serde(rename = "maxMemoryGb")]
        max_memory_gb: u32,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PowerExceeded { max_power_w } => {
                write!(f, "power consumption exceeds maximum ({}W)", max_power_w)
            }
            Self::MemoryExceeded { max_memory_gb } => {
                write!(f, "memory capacity exceeds maximum ({}GB)", max_memory_gb)
            }
        }
    }
}

/// Reason a configuration cannot be saved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReadinessIssue {
    NoChassis,
    MissingCpu,
    MissingMemory,
    PowerExceeded {
        #[serde(rename = "totalW")]
        total_w: u32,
        #[serde(rename = "maxW")]
        max_w: u32,
    },
}

impl std::fmt::Display for ReadinessIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoChassis => write!(f, "select a server model"),
            Self::MissingCpu => write!(f, "at least one CPU is required"),
            Self::MissingMemory => write!(f, "at least one memory module is required"),
            Self::PowerExceeded { total_w, max_w } => {
                write!(f, "power consumption over limit ({}W / {}W)", total_w, max_w)
            }
        }
    }
}

/// A configuration accepted by the save check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedConfiguration {
    pub server: String,
    pub components: ComponentLists,
    pub total_power_w: u32,
    pub timestamp: String,
}

/// Everything a view needs to render one session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub chassis: Option<String>,
    pub selected: ComponentLists,
    pub available: ComponentLists,
    pub can_add: HashMap<Category, bool>,
    pub totals: Totals,
    pub power_utilization: f64,
    pub warnings: Vec<String>,
    pub policy: RulePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_lists_accessors() {
        let mut lists = ComponentLists::default();
        assert!(lists.is_empty());
        lists.get_mut(Category::Gpu).push("G".into());
        lists.get_mut(Category::Cpu).push("C".into());
        assert_eq!(lists.len(), 2);
        assert_eq!(lists.get(Category::Gpu), &["G".to_string()]);

        let order: Vec<&String> = lists.iter_all().collect();
        assert_eq!(order, vec!["C", "G"]);

        lists.clear();
        assert!(lists.is_empty());
    }

    #[test]
    fn test_warning_text() {
        assert_eq!(
            Warning::PowerExceeded { max_power_w: 800 }.to_string(),
            "power consumption exceeds maximum (800W)"
        );
        assert_eq!(
            Warning::MemoryExceeded { max_memory_gb: 3072 }.to_string(),
            "memory capacity exceeds maximum (3072GB)"
        );
    }

    #[test]
    fn test_readiness_issue_json() {
        let json = serde_json::to_value(ReadinessIssue::PowerExceeded {
            total_w: 900,
            max_w: 800,
        })
        .unwrap();
        assert_eq!(json["kind"], "powerExceeded");
        assert_eq!(json["totalW"], 900);
    }
}
