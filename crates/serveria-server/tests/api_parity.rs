//! API parity tests — validates that the JSON shapes produced by the engine
//! match what the configurator view reads.
//!
//! These tests drive sessions directly (no HTTP server needed) and check
//! field names and types of the serialized values.

use std::sync::Arc;

use serveria_catalog::{Catalog, Category};
use serveria_core::{CatalogVariant, RulePolicy};
use serveria_engine::{ConfigSession, DropPayload, SessionRegistry};

fn enterprise_session() -> ConfigSession {
    let catalog = Arc::new(Catalog::builtin(CatalogVariant::Enterprise).unwrap());
    ConfigSession::new(catalog, RulePolicy::for_variant(CatalogVariant::Enterprise))
}

/// Session view read by the canvas:
/// { chassis, selected{cpu,memory,gpu}, available{...}, canAdd, totals, warnings }
#[test]
fn test_session_view_shape() {
    let mut session = enterprise_session();
    session.select_chassis("HPE ProLiant DL360 Gen10 Plus").unwrap();
    session.add(Category::Cpu, "Intel Xeon Gold 6248R");

    let view = serde_json::to_value(session.view()).unwrap();
    assert!(view["chassis"].is_string());
    for key in ["cpu", "memory", "gpu"] {
        assert!(view["selected"][key].is_array());
        assert!(view["available"][key].is_array());
        assert!(view["canAdd"][key].is_boolean());
    }
    assert!(view["totals"]["powerW"].is_number());
    assert!(view["totals"]["memoryGb"].is_number());
    assert!(view["totals"]["cores"].is_number());
    assert!(view["powerUtilization"].is_number());
    assert!(view["warnings"].is_array());
    assert_eq!(view["policy"]["availability"], "static");
    assert_eq!(view["policy"]["memoryLimit"], "capacity");
    assert_eq!(view["policy"]["enforceCompatibility"], true);
}

/// An empty session serializes with a null chassis and nothing addable.
#[test]
fn test_empty_session_view_shape() {
    let view = serde_json::to_value(enterprise_session().view()).unwrap();
    assert!(view["chassis"].is_null());
    assert_eq!(view["canAdd"]["memory"], false);
    assert_eq!(view["totals"]["powerW"], 0);
}

/// Drag data written by the component list on drag start.
#[test]
fn test_drag_payload_shape() {
    let raw = DropPayload::new(Category::Gpu, "NVIDIA L40S").encode().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["componentType"], "gpu");
    assert_eq!(json["componentName"], "NVIDIA L40S");
}

/// Catalog rows rendered on the server model buttons.
#[test]
fn test_chassis_shape() {
    let catalog = Catalog::builtin(CatalogVariant::Enterprise).unwrap();
    let json = serde_json::to_value(catalog.chassis_spec("Dell PowerEdge XE8712").unwrap()).unwrap();
    assert!(json["name"].is_string());
    assert!(json["maxCpu"].is_number());
    assert!(json["maxGpu"].is_number());
    assert!(json["maxMemory"].is_number());
    assert_eq!(json["maxPowerW"], 2000);
    assert!(json["compatibleCpus"].is_array());
    assert!(json["compatibleMemory"].is_array());
    assert!(json["compatibleGpus"].is_array());
}

/// Saved configuration: { server, components, totalPowerW, timestamp }
#[test]
fn test_saved_configuration_shape() {
    let mut session = enterprise_session();
    session.select_chassis("Dell PowerEdge R750").unwrap();
    session.add(Category::Cpu, "Intel Xeon Gold 6248R");
    session.add(Category::Memory, "32GB DDR4-3200");

    let saved = serde_json::to_value(session.snapshot("2026-10-19T00:00:00Z").unwrap()).unwrap();
    assert_eq!(saved["server"], "Dell PowerEdge R750");
    assert!(saved["components"]["cpu"].is_array());
    assert_eq!(saved["totalPowerW"], 168);
    assert!(saved["timestamp"].is_string());
}

/// Session listing rows.
#[test]
fn test_session_list_shape() {
    let catalog = Arc::new(Catalog::builtin(CatalogVariant::Classic).unwrap());
    let registry =
        SessionRegistry::new(catalog, RulePolicy::for_variant(CatalogVariant::Classic), 4);
    registry.create();

    let rows = serde_json::to_value(registry.list()).unwrap();
    let row = &rows[0];
    assert!(row["id"].is_string());
    assert!(row["chassis"].is_null());
    assert!(row["components"].is_number());
    assert!(row["createdAt"].is_string());
    assert!(row["lastUsed"].is_string());
}

/// Classic lineup: memory ceilings are module counts and the component
/// lists partition as parts move onto the chassis.
#[test]
fn test_classic_variant_rules() {
    let catalog = Arc::new(Catalog::builtin(CatalogVariant::Classic).unwrap());
    let mut session = ConfigSession::new(catalog, RulePolicy::for_variant(CatalogVariant::Classic));
    session.select_chassis("SuperMicro SYS-2029GP").unwrap();

    assert!(session.add(Category::Memory, "64GB DDR4-3200"));
    assert_eq!(session.available(Category::Memory), &["32GB DDR4-3200".to_string()]);
    assert!(!session.add(Category::Memory, "64GB DDR4-3200"));
    assert!(session.add(Category::Memory, "32GB DDR4-3200"));
    assert!(session.available(Category::Memory).is_empty());
    assert_eq!(session.totals().memory_gb, 96);
    assert!(session.warnings().is_empty());
}
