//! Serveria — server configurator backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serveria_catalog::Catalog;
use serveria_core::ServeriaConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

fn validate_catalog(path: &Path) -> bool {
    match Catalog::load(path) {
        Ok(catalog) => {
            let summary = catalog.summary();
            println!("Catalog OK: {}", path.display());
            println!("  Server models: {}", summary.chassis);
            println!("  CPUs:          {}", summary.cpus);
            println!("  Memory:        {}", summary.memory);
            println!("  GPUs:          {}", summary.gpus);
            true
        }
        Err(e) => {
            eprintln!("Catalog invalid: {}: {}", path.display(), e);
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "--validate" | "validate" => {
                if args.len() < 3 {
                    eprintln!("Usage: serveria validate <catalog.json>");
                    std::process::exit(1);
                }
                let ok = validate_catalog(&PathBuf::from(&args[2]));
                std::process::exit(if ok { 0 } else { 1 });
            }
            "--help" | "-h" | "help" => {
                println!("Serveria — server configurator backend");
                println!();
                println!("Usage: serveria [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the server");
                println!("  validate <catalog.json>  Check a catalog file for consistency");
                println!("  help                     Show this help message");
                println!();
                println!("Environment:");
                println!("  PORT, SERVERIA_CATALOG, SERVERIA_CATALOG_VARIANT,");
                println!("  SERVERIA_AVAILABILITY, SERVERIA_MEMORY_LIMIT,");
                println!("  SERVERIA_ENFORCE_COMPATIBILITY, SERVERIA_MAX_SESSIONS");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'serveria help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Initialize configuration
    let config = ServeriaConfig::from_env()?;
    let port = config.port;

    let catalog = Catalog::from_source(&config.catalog)?;
    info!(
        "Catalog ready: {} server models, {} components",
        catalog.chassis().len(),
        catalog.components().len()
    );
    info!("Rule policy: {:?}", config.policy);

    let state = Arc::new(AppState::new(config, catalog));

    // Build router
    let app = routes::build_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Serveria server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
