//! Plain-text spec sheet for a finished configuration.

use serveria_catalog::{Catalog, Category};
use serveria_core::{Error, Result};

use crate::session::ConfigSession;

const RULE: &str = "=========================================";
const HEADING_INDENT: &str = "                                ";
const FOOTER: &str = "          Powered by Serveria Server Configurator";

/// Renders the copyable configuration summary.
pub struct SpecSheet;

impl SpecSheet {
    /// Render the sheet. `generated_at` is printed verbatim.
    pub fn render(session: &ConfigSession, generated_at: &str) -> Result<String> {
        let chassis = session.chassis().ok_or(Error::NoChassisSelected)?;
        let selected = session.selection();
        if selected.is_empty() {
            return Err(Error::EmptyConfiguration);
        }
        let catalog = session.catalog();
        let totals = session.totals();

        let mut out = String::new();
        heading(&mut out, "Server Configuration Spec Sheet", false);
        out.push('\n');
        out.push_str(&format!("Selected server: {}\n", chassis.name));
        out.push_str(&format!("Generated: {}\n\n", generated_at));

        heading(&mut out, "Included Components", true);
        out.push('\n');
        for category in [Category::Cpu, Category::Gpu, Category::Memory] {
            let names = selected.get(category);
            if names.is_empty() {
                continue;
            }
            out.push_str(&format!("{} ({}):\n", category, names.len()));
            for (i, name) in names.iter().enumerate() {
                out.push_str(&format!("{}. {} ({})\n", i + 1, name, details(catalog, category, name)));
            }
            out.push('\n');
        }

        heading(&mut out, "System Summary", true);
        out.push('\n');
        out.push_str(&format!("Total memory capacity: {}GB\n", totals.memory_gb));
        out.push_str(&format!("Total CPU cores: {}\n", totals.cores));
        out.push_str(&format!("Total power draw: {}W\n", totals.power_w));
        out.push_str(&format!("Maximum power allowed: {}W\n", chassis.max_power_w));
        out.push_str(&format!("Power utilization: {:.1}%\n\n", session.power_utilization()));

        let warnings = session.warnings();
        if !warnings.is_empty() {
            heading(&mut out, "Warnings", true);
            for (i, warning) in warnings.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, warning));
            }
            out.push('\n');
        }

        out.push_str(RULE);
        out.push('\n');
        out.push_str(FOOTER);
        out.push('\n');
        out.push_str(RULE);
        Ok(out)
    }
}

/// Title line followed by a rule; section headings are framed on both sides.
fn heading(out: &mut String, title: &str, framed: bool) {
    if framed {
        out.push_str(RULE);
        out.push('\n');
    }
    out.push_str(HEADING_INDENT);
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
}

fn details(catalog: &Catalog, category: Category, name: &str) -> String {
    let spec = catalog.component_spec(name);
    let power = spec.map(|s| s.power_w).unwrap_or(0);
    let capacity = spec.map(|s| s.capacity_or_zero()).unwrap_or(0);
    match category {
        Category::Cpu => {
            let cores = spec.map(|s| s.cores_or_zero()).unwrap_or(0);
            format!("{} cores, {}W", cores, power)
        }
        Category::Gpu => format!("{}GB VRAM, {}W", capacity, power),
        Category::Memory => format!("{}GB, {}W", capacity, power),
    }
}
