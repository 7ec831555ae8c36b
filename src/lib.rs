// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, ConfigOverrides, load_or_default, save_to_path};
use crate::engine::Runner;
use crate::exec::lifecycle_for;
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading, CLI overrides and `--save`
/// - the process lifecycle for the configured command
/// - the runner (watcher pipeline + restart loop)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let config_path = PathBuf::from(&args.config);

    let raw = load_or_default(fs.as_ref(), &config_path)?;
    let raw = ConfigOverrides::from_cli(&args).apply(raw);
    if args.save {
        save_to_path(fs.as_ref(), &config_path, &raw)?;
    }
    let cfg = ConfigFile::try_from(raw)?;

    if args.dry_run {
        print_dry_run(&cfg, &config_path);
        return Ok(());
    }

    let root = std::path::absolute(&cfg.directory)
        .with_context(|| format!("resolving directory {:?}", cfg.directory))?;

    let span = info_span!("rewatch");
    let lifecycle = lifecycle_for(
        cfg.command.clone(),
        cfg.escalation.clone(),
        info_span!(parent: &span, "command"),
    );
    if cfg.command.is_null() {
        info!("no command configured; only watching");
    }

    let runner = Arc::new(
        Runner::new(root, Arc::new(cfg.patterns), lifecycle, cfg.options)
            .with_filesystem(fs)
            .with_span(span),
    );

    // Ctrl-C -> graceful shutdown. The command runs in its own process
    // group, so it doesn't see the terminal's interrupt; exit() stops it.
    {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            if let Err(e) = runner.exit().await {
                warn!(error = %e, "failed to stop command on shutdown");
            }
        });
    }

    runner.run().await?;
    Ok(())
}

/// Print the effective configuration.
fn print_dry_run(cfg: &ConfigFile, config_path: &Path) {
    println!("rewatch dry-run (config: {})", config_path.display());
    println!("  directory      = {}", cfg.directory.display());
    println!("  patterns       = [{}]", cfg.patterns);
    if cfg.command.is_null() {
        println!("  command        = (none)");
    } else {
        println!("  command        = {}", cfg.command);
    }
    println!("  quiet_window   = {:?}", cfg.options.quiet_window);
    println!("  settle_delay   = {:?}", cfg.options.settle_delay);
    println!("  terminate_wait = {:?}", cfg.options.terminate_wait);
    let signals: Vec<&str> = cfg.escalation.steps().iter().map(|s| s.as_str()).collect();
    println!("  stop_signals   = [{}]", signals.join(", "));
}
