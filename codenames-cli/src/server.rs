//! Server command - start the HTTP API server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), serve()
//! - Level 3: check_store_path(), check_viewer_dir()
//! - Level 4: (delegated to codenames-server crate)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use codenames_arena::{ProviderFailurePolicy, SimulationConfig};
use codenames_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// JSON match store
    #[arg(long, value_name = "FILE", default_value = "data/matches.json")]
    pub store: PathBuf,

    /// Directory containing static files for a viewer
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Provider failure handling: abort or random
    #[arg(long, default_value = "abort")]
    pub policy: ProviderFailurePolicy,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Check paths and build the server config
/// 2. Serve until shutdown
pub fn run(args: ServerArgs, seed: Option<u64>) -> Result<()> {
    let config = configure_server(&args, seed)?;

    tracing::info!(
        "Serving Codenames API on port {} (store {}, policy {:?})",
        config.port,
        args.store.display(),
        config.simulation.failure_policy
    );

    serve(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn configure_server(args: &ServerArgs, seed: Option<u64>) -> Result<ServerConfig> {
    check_store_path(&args.store)?;
    if let Some(dir) = &args.static_dir {
        check_viewer_dir(dir)?;
    }

    let mut simulation = SimulationConfig::default().with_failure_policy(args.policy);
    if let Some(s) = seed {
        simulation = simulation.with_seed(s);
    }

    Ok(ServerConfig {
        port: args.port,
        static_dir: args
            .static_dir
            .as_ref()
            .map(|d| d.to_string_lossy().to_string()),
        store_path: Some(args.store.clone()),
        simulation,
    })
}

/// Drive the async server on its own runtime until it exits
fn serve(config: ServerConfig) -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?
        .block_on(run_server(config))
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// The match store must be a file path; it is created on open if missing
fn check_store_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        anyhow::bail!(
            "--store must name a JSON file, but {} is a directory",
            path.display()
        );
    }
    Ok(())
}

/// A missing viewer directory only disables the static fallback
fn check_viewer_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Viewer directory {} not found; only /api routes will answer",
            path.display()
        );
        return Ok(());
    }
    if !path.is_dir() {
        anyhow::bail!("--static-dir {} is a file, not a directory", path.display());
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
