//! Single configuration session: chosen chassis, selection, derived state.

use std::collections::HashMap;
use std::sync::Arc;

use serveria_catalog::{Catalog, Category, ChassisSpec};
use serveria_core::{AvailabilityMode, Error, MemoryLimitMode, Result, RulePolicy};
use tracing::{debug, error, info, warn};

use crate::payload::DropPayload;
use crate::types::*;
use crate::validation;

/// Selection state for one user of the configurator.
///
/// Every mutating call finishes by recomputing totals and warnings from
/// scratch, so the derived fields never lag behind the selection.
#[derive(Debug, Clone)]
pub struct ConfigSession {
    catalog: Arc<Catalog>,
    policy: RulePolicy,
    chassis: Option<String>,
    selected: ComponentLists,
    available: ComponentLists,
    totals: Totals,
    warnings: Vec<Warning>,
}

impl ConfigSession {
    pub fn new(catalog: Arc<Catalog>, policy: RulePolicy) -> Self {
        Self {
            catalog,
            policy,
            chassis: None,
            selected: ComponentLists::default(),
            available: ComponentLists::default(),
            totals: Totals::default(),
            warnings: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &RulePolicy {
        &self.policy
    }

    pub fn chassis(&self) -> Option<&ChassisSpec> {
        self.chassis
            .as_deref()
            .and_then(|name| self.catalog.chassis_spec(name))
    }

    pub fn selection(&self) -> &ComponentLists {
        &self.selected
    }

    pub fn available(&self, category: Category) -> &[String] {
        self.available.get(category)
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Choose a chassis, emptying the selection.
    ///
    /// Unknown names leave the session untouched.
    pub fn select_chassis(&mut self, name: &str) -> Result<&ChassisSpec> {
        let spec = self
            .catalog
            .chassis_spec(name)
            .ok_or_else(|| Error::NotFound(format!("server model '{}'", name)))?;
        let available = Self::compatibility_lists(spec);

        self.chassis = Some(name.to_string());
        self.selected.clear();
        self.available = available;
        self.refresh();
        info!("Selected server model {}", name);
        self.chassis()
            .ok_or_else(|| Error::Internal(format!("server model '{}' vanished", name)))
    }

    /// Empty the selection but keep the chosen chassis.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.available = match self.chassis() {
            Some(spec) => Self::compatibility_lists(spec),
            None => ComponentLists::default(),
        };
        self.refresh();
    }

    /// Whether one more component of this category fits the chassis.
    pub fn can_add(&self, category: Category) -> bool {
        let Some(spec) = self.chassis() else {
            return false;
        };
        let current = self.selected.get(category).len();
        match category {
            Category::Memory if self.policy.memory_limit == MemoryLimitMode::Capacity => true,
            _ => current < spec.max_for(category) as usize,
        }
    }

    /// Append a component to its category. Refusals are silent no-ops and
    /// return `false`; the selection is only touched once every check passed.
    pub fn add(&mut self, category: Category, component: &str) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let Some(spec) = self.chassis.as_deref().and_then(|n| catalog.chassis_spec(n)) else {
            debug!("Ignoring {} '{}': no server model selected", category, component);
            return false;
        };

        if !self.can_add(category) {
            debug!("Ignoring {} '{}': no free slot", category, component);
            return false;
        }

        let compatible = spec.is_compatible(category, component);
        if self.policy.enforce_compatibility && !compatible {
            warn!(
                "Ignoring {} '{}': not compatible with {}",
                category, component, spec.name
            );
            return false;
        }

        let taken_from = if self.policy.availability == AvailabilityMode::Partitioned {
            match self.available.get(category).iter().position(|c| c == component) {
                Some(pos) => Some(pos),
                None if compatible => {
                    debug!("Ignoring {} '{}': already selected", category, component);
                    return false;
                }
                None => None,
            }
        } else {
            None
        };

        if let Some(pos) = taken_from {
            self.available.get_mut(category).remove(pos);
        }
        self.selected.get_mut(category).push(component.to_string());
        self.refresh();
        true
    }

    /// Remove the component at `index`, returning its name.
    pub fn remove(&mut self, category: Category, index: usize) -> Option<String> {
        let list = self.selected.get_mut(category);
        if index >= list.len() {
            debug!("Ignoring removal of {} #{}: out of range", category, index);
            return None;
        }
        let removed = list.remove(index);

        if self.policy.availability == AvailabilityMode::Partitioned {
            let returns = self
                .chassis()
                .map(|spec| spec.is_compatible(category, &removed))
                .unwrap_or(false);
            let available = self.available.get_mut(category);
            if returns && !available.contains(&removed) {
                available.push(removed.clone());
            }
        }

        self.refresh();
        Some(removed)
    }

    /// Apply a serialized drag-and-drop payload. Malformed payloads are
    /// logged and dropped.
    pub fn handle_drop(&mut self, raw: &str) -> bool {
        match DropPayload::parse(raw) {
            Ok(payload) => self.add(payload.component_type, &payload.component_name),
            Err(e) => {
                error!("Failed to handle drop payload: {}", e);
                false
            }
        }
    }

    /// Issues that block saving; empty when the configuration is complete.
    pub fn readiness(&self) -> Vec<ReadinessIssue> {
        validation::readiness(self.chassis(), &self.selected, &self.totals)
    }

    /// Snapshot a complete configuration. Nothing is persisted.
    pub fn snapshot(&self, timestamp: &str) -> Result<SavedConfiguration> {
        let issues = self.readiness();
        if !issues.is_empty() {
            let reasons: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
            return Err(Error::Validation(reasons.join("; ")));
        }
        let server = self.chassis.clone().ok_or(Error::NoChassisSelected)?;
        let saved = SavedConfiguration {
            server,
            components: self.selected.clone(),
            total_power_w: self.totals.power_w,
            timestamp: timestamp.to_string(),
        };
        info!(
            "Saved configuration for {} ({} components, {}W)",
            saved.server,
            saved.components.len(),
            saved.total_power_w
        );
        Ok(saved)
    }

    pub fn power_utilization(&self) -> f64 {
        let max = self.chassis().map(|c| c.max_power_w).unwrap_or(0);
        validation::power_utilization(self.totals.power_w, max)
    }

    pub fn view(&self) -> SessionView {
        let can_add: HashMap<Category, bool> = Category::all()
            .iter()
            .map(|&c| (c, self.can_add(c)))
            .collect();
        SessionView {
            chassis: self.chassis.clone(),
            selected: self.selected.clone(),
            available: self.available.clone(),
            can_add,
            totals: self.totals,
            power_utilization: self.power_utilization(),
            warnings: self.warnings.iter().map(|w| w.to_string()).collect(),
            policy: *self.policy(),
        }
    }

    fn compatibility_lists(spec: &ChassisSpec) -> ComponentLists {
        ComponentLists {
            cpu: spec.compatible_cpus.clone(),
            memory: spec.compatible_memory.clone(),
            gpu: spec.compatible_gpus.clone(),
        }
    }

    fn refresh(&mut self) {
        self.totals = Totals::compute(&self.catalog, &self.selected);
        self.warnings = match self.chassis() {
            Some(spec) => validation::evaluate(spec, &self.totals, &self.policy),
            None => Vec::new(),
        };
    }
}
