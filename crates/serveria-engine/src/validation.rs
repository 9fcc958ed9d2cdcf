//! Totals and threshold checks.
//!
//! Everything here is a pure function of the catalog, the chosen chassis and
//! the selection. Sessions call these after every mutation and replace their
//! previous results wholesale.

use serveria_catalog::{Catalog, ChassisSpec};
use serveria_core::{MemoryLimitMode, RulePolicy};
use tracing::debug;

use crate::types::{ComponentLists, ReadinessIssue, Totals, Warning};

impl Totals {
    /// Sum power over every selected component, memory capacity over memory
    /// modules and cores over CPUs. Names missing from the catalog count as zero.
    pub fn compute(catalog: &Catalog, selected: &ComponentLists) -> Self {
        let mut totals = Totals::default();

        for name in selected.iter_all() {
            match catalog.component_spec(name) {
                Some(spec) => totals.power_w = totals.power_w.saturating_add(spec.power_w),
                None => debug!("No catalog entry for '{}', counting as zero", name),
            }
        }

        totals.memory_gb = selected
            .memory
            .iter()
            .filter_map(|name| catalog.component_spec(name))
            .fold(0u32, |sum, spec| sum.saturating_add(spec.capacity_or_zero()));

        totals.cores = selected
            .cpu
            .iter()
            .filter_map(|name| catalog.component_spec(name))
            .fold(0u32, |sum, spec| sum.saturating_add(spec.cores_or_zero()));

        totals
    }
}

/// Compare totals against the chassis ceilings. Power is checked first, then
/// memory; memory is only checked when `max_memory` is a GB ceiling.
pub fn evaluate(chassis: &ChassisSpec, totals: &Totals, policy: &RulePolicy) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if totals.power_w > chassis.max_power_w {
        warnings.push(Warning::PowerExceeded {
            max_power_w: chassis.max_power_w,
        });
    }

    if policy.memory_limit == MemoryLimitMode::Capacity && totals.memory_gb > chassis.max_memory {
        warnings.push(Warning::MemoryExceeded {
            max_memory_gb: chassis.max_memory,
        });
    }

    warnings
}

/// Checks run before a configuration may be saved.
pub fn readiness(
    chassis: Option<&ChassisSpec>,
    selected: &ComponentLists,
    totals: &Totals,
) -> Vec<ReadinessIssue> {
    let mut issues = Vec::new();

    if chassis.is_none() {
        issues.push(ReadinessIssue::NoChassis);
    }
    if selected.cpu.is_empty() {
        issues.push(ReadinessIssue::MissingCpu);
    }
    if selected.memory.is_empty() {
        issues.push(ReadinessIssue::MissingMemory);
    }
    if let Some(chassis) = chassis {
        if totals.power_w > chassis.max_power_w {
            issues.push(ReadinessIssue::PowerExceeded {
                total_w: totals.power_w,
                max_w: chassis.max_power_w,
            });
        }
    }

    issues
}

/// Share of the chassis power budget in use, in percent.
pub fn power_utilization(total_w: u32, max_w: u32) -> f64 {
    if max_w == 0 {
        return 0.0;
    }
    f64::from(total_w) / f64::from(max_w) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serveria_catalog::{CatalogFile, Category, ComponentSpec};

    fn component(name: &str, category: Category, power_w: u32) -> ComponentSpec {
        ComponentSpec {
            name: name.into(),
            category,
            power_w,
            cores: (category == Category::Cpu).then_some(16),
            capacity_gb: (category != Category::Cpu).then_some(64),
        }
    }

    fn chassis(max_power_w: u32, max_memory: u32) -> ChassisSpec {
        ChassisSpec {
            name: "Box".into(),
            max_cpu: 2,
            max_gpu: 2,
            max_memory,
            max_power_w,
            compatible_cpus: vec!["A".into()],
            compatible_memory: vec!["M".into()],
            compatible_gpus: vec!["G".into()],
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(CatalogFile {
            chassis: vec![chassis(800, 128)],
            components: vec![
                component("A", Category::Cpu, 150),
                component("M", Category::Memory, 20),
                component("G", Category::Gpu, 700),
            ],
        })
        .unwrap()
    }

    fn lists(cpu: &[&str], memory: &[&str], gpu: &[&str]) -> ComponentLists {
        let own = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        ComponentLists {
            cpu: own(cpu),
            memory: own(memory),
            gpu: own(gpu),
        }
    }

    #[test]
    fn test_totals_sum_per_category() {
        let totals = Totals::compute(&catalog(), &lists(&["A", "A"], &["M", "M", "M"], &["G"]));
        assert_eq!(totals.power_w, 150 * 2 + 20 * 3 + 700);
        assert_eq!(totals.memory_gb, 64 * 3);
        assert_eq!(totals.cores, 32);
    }

    #[test]
    fn test_totals_are_additive() {
        let c = catalog();
        let whole = Totals::compute(&c, &lists(&["A"], &["M"], &["G"]));
        let parts = [
            Totals::compute(&c, &lists(&["A"], &[], &[])),
            Totals::compute(&c, &lists(&[], &["M"], &[])),
            Totals::compute(&c, &lists(&[], &[], &["G"])),
        ];
        assert_eq!(whole.power_w, parts.iter().map(|t| t.power_w).sum::<u32>());
        assert_eq!(whole.memory_gb, parts.iter().map(|t| t.memory_gb).sum::<u32>());
        assert_eq!(whole.cores, parts.iter().map(|t| t.cores).sum::<u32>());
    }

    #[test]
    fn test_unknown_names_count_as_zero() {
        let totals = Totals::compute(&catalog(), &lists(&["A", "Ghost"], &["Ghost"], &[]));
        assert_eq!(totals.power_w, 150);
        assert_eq!(totals.cores, 16);
        assert_eq!(totals.memory_gb, 0);
    }

    #[test]
    fn test_no_warnings_within_limits() {
        let totals = Totals {
            power_w: 800,
            memory_gb: 128,
            cores: 0,
        };
        assert!(evaluate(&chassis(800, 128), &totals, &RulePolicy::default()).is_empty());
    }

    #[test]
    fn test_warning_order_power_then_memory() {
        let totals = Totals {
            power_w: 801,
            memory_gb: 129,
            cores: 0,
        };
        let warnings = evaluate(&chassis(800, 128), &totals, &RulePolicy::default());
        assert_eq!(
            warnings,
            vec![
                Warning::PowerExceeded { max_power_w: 800 },
                Warning::MemoryExceeded { max_memory_gb: 128 },
            ]
        );
    }

    #[test]
    fn test_module_limit_skips_memory_warning() {
        let policy = RulePolicy {
            memory_limit: MemoryLimitMode::Modules,
            ..RulePolicy::default()
        };
        let totals = Totals {
            power_w: 0,
            memory_gb: 4096,
            cores: 0,
        };
        assert!(evaluate(&chassis(800, 16), &totals, &policy).is_empty());
    }

    #[test]
    fn test_readiness_without_chassis() {
        let issues = readiness(None, &ComponentLists::default(), &Totals::default());
        assert_eq!(
            issues,
            vec![
                ReadinessIssue::NoChassis,
                ReadinessIssue::MissingCpu,
                ReadinessIssue::MissingMemory,
            ]
        );
    }

    #[test]
    fn test_readiness_reports_power() {
        let c = chassis(800, 128);
        let selected = lists(&["A"], &["M"], &[]);
        let totals = Totals {
            power_w: 900,
            memory_gb: 64,
            cores: 16,
        };
        assert_eq!(
            readiness(Some(&c), &selected, &totals),
            vec![ReadinessIssue::PowerExceeded {
                total_w: 900,
                max_w: 800
            }]
        );
    }

    #[test]
    fn test_power_utilization() {
        assert_eq!(power_utilization(400, 800), 50.0);
        assert_eq!(power_utilization(100, 0), 0.0);
    }
}
