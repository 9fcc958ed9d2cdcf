//! Drag-and-drop payload carried from the component list to the chassis.

use serde::{Deserialize, Serialize};
use serveria_catalog::Category;
use serveria_core::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropPayload {
    pub component_type: Category,
    pub component_name: String,
}

impl DropPayload {
    pub fn new(component_type: Category, component_name: impl Into<String>) -> Self {
        Self {
            component_type,
            component_name: component_name.into(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialize for a drag-start event.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
