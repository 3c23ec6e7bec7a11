//! site-sync
//!
//! Keeps a web server's virtual-host entries in line with a declarative
//! project list.
//!
//! # Architecture Overview
//!
//! ```text
//!   projects.json ──▶ project::validator ──▶ ProjectBatch ─┐
//!                                                          ▼
//!   templates.json ─▶ template::catalog ──────────▶ sync::engine ──▶ store
//!                                                          │      (available/
//!                                                          │        enabled)
//!                                                          ▼
//!                                            server::apply_changes
//!                                         validate ──▶ reload | restart
//! ```
//!
//! Exit code 1 means the run never started: unreadable inputs, zero valid
//! projects, missing privilege, or a held lock. Per-project failures are
//! reported and do not change the exit code.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use site_sync::config::watcher::InputWatcher;
use site_sync::config::{load_or_default, PostSyncAction, SyncConfig};
use site_sync::lifecycle::signals::shutdown_signal;
use site_sync::lifecycle::{check_privileges, load_projects, load_templates, RunLock};
use site_sync::observability::init_logging;
use site_sync::server::ServerOutcome;
use site_sync::sites::{delete_sites, list_sites};
use site_sync::{CommandController, ConfigStore, ServerController, SyncEngine, SyncReport};

#[derive(Parser)]
#[command(name = "site-sync", version)]
#[command(about = "Create, list and remove web-server site configurations", long_about = None)]
struct Cli {
    /// Tool configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive; RUST_LOG takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Override the available-entries directory.
    #[arg(long, global = true)]
    available_dir: Option<PathBuf>,

    /// Override the enabled-entries directory.
    #[arg(long, global = true)]
    enabled_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct InputArgs {
    /// Project list (JSON array).
    #[arg(long)]
    projects: Option<PathBuf>,

    /// Template set (JSON object).
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Restart instead of reloading after a passing test.
    #[arg(long)]
    restart: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing site entries, then test and reload the server
    Sync {
        #[command(flatten)]
        inputs: InputArgs,

        /// Report what would be created without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available and enabled site entries
    List {
        /// Print the body of each available and enabled entry
        #[arg(long)]
        content: bool,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove site entries, then test and reload the server
    Delete {
        /// Site names to remove
        #[arg(required = true)]
        names: Vec<String>,

        /// Restart instead of reloading after a passing test
        #[arg(long)]
        restart: bool,
    },
    /// Run the server configuration test only
    Check,
    /// Sync, then sync again whenever the inputs change
    Watch {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("site-sync: failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    init_logging(&level);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut config: SyncConfig) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = cli.available_dir {
        config.paths.available_dir = dir;
    }
    if let Some(dir) = cli.enabled_dir {
        config.paths.enabled_dir = dir;
    }

    let store = ConfigStore::new(&config.paths.available_dir, &config.paths.enabled_dir);
    let controller = CommandController::new(config.server.clone());

    match cli.command {
        Commands::Sync {
            inputs,
            dry_run,
            json,
        } => {
            apply_inputs(&mut config, &inputs);
            if !dry_run {
                check_privileges(&store)?;
            }
            let _lock = if dry_run {
                None
            } else {
                RunLock::maybe_acquire(config.paths.lock_file.as_deref())?
            };

            let engine = SyncEngine::new(store).with_dry_run(dry_run);
            let report = sync_once(&engine, &config, &controller).await?;
            print_report(&report, json)?;
        }
        Commands::List { content, json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&store.list()?)?);
            } else {
                print!("{}", list_sites(&store, content)?);
            }
        }
        Commands::Delete { names, restart } => {
            if restart {
                config.server.post_sync_action = PostSyncAction::Restart;
            }
            check_privileges(&store)?;
            let _lock = RunLock::maybe_acquire(config.paths.lock_file.as_deref())?;

            let report =
                delete_sites(&store, &names, &controller, config.server.post_sync_action).await;
            for removal in &report.removals {
                match &removal.error {
                    Some(e) => println!("{}: error: {}", removal.name, e),
                    None => println!(
                        "{}: link {}, config {}{}",
                        removal.name,
                        if removal.enabled_removed { "removed" } else { "absent" },
                        if removal.available_removed { "removed" } else { "absent" },
                        if removal.dangling { " (link was dangling)" } else { "" },
                    ),
                }
            }
            print_server(&report.server);
        }
        Commands::Check => match controller.validate().await {
            Ok(stdout) => {
                println!("Configuration test passed");
                if !stdout.trim().is_empty() {
                    println!("{}", stdout.trim_end());
                }
            }
            Err(diagnostics) => {
                return Err(format!("configuration test failed:\n{diagnostics}").into());
            }
        },
        Commands::Watch { inputs } => {
            apply_inputs(&mut config, &inputs);
            check_privileges(&store)?;
            watch(SyncEngine::new(store), &config, &controller).await?;
        }
    }

    Ok(())
}

fn apply_inputs(config: &mut SyncConfig, inputs: &InputArgs) {
    if let Some(path) = &inputs.projects {
        config.paths.projects_file = path.clone();
    }
    if let Some(path) = &inputs.templates {
        config.paths.templates_file = path.clone();
    }
    if inputs.restart {
        config.server.post_sync_action = PostSyncAction::Restart;
    }
}

async fn sync_once<C: ServerController>(
    engine: &SyncEngine,
    config: &SyncConfig,
    controller: &C,
) -> Result<SyncReport, Box<dyn Error>> {
    let batch = load_projects(&config.paths.projects_file)?;
    let templates = load_templates(&config.paths.templates_file)?;
    Ok(engine
        .run(&batch, &templates, controller, config.server.post_sync_action)
        .await)
}

async fn watch<C: ServerController>(
    engine: SyncEngine,
    config: &SyncConfig,
    controller: &C,
) -> Result<(), Box<dyn Error>> {
    let inputs = [
        config.paths.projects_file.as_path(),
        config.paths.templates_file.as_path(),
    ];
    let (watcher, mut changes) = InputWatcher::new(&inputs);
    let _handle = watcher.run()?;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        match RunLock::maybe_acquire(config.paths.lock_file.as_deref()) {
            Ok(_lock) => match sync_once(&engine, config, controller).await {
                Ok(report) => print_report(&report, false)?,
                Err(e) => tracing::error!("Sync skipped: {e}"),
            },
            Err(e) => tracing::error!("Sync skipped: {e}"),
        }

        tokio::select! {
            changed = changes.recv() => {
                let Some(path) = changed else { break };
                tracing::info!(path = ?path, "Input changed, re-running sync");
                // Editors often emit several events per save.
                tokio::time::sleep(Duration::from_millis(500)).await;
                while changes.try_recv().is_ok() {}
            }
            _ = &mut shutdown => break,
        }
    }

    tracing::info!("Watch stopped");
    Ok(())
}

fn print_report(report: &SyncReport, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{}", report.result.summary());
    print_server(&report.server);
    Ok(())
}

fn print_server(outcome: &ServerOutcome) {
    match outcome {
        ServerOutcome::NoChanges => println!("No changes, server not reloaded"),
        ServerOutcome::Applied { action } => println!("Configuration valid, server {action} done"),
        ServerOutcome::ActionFailed { action, reason } => {
            println!("Configuration valid, but server {action} failed: {reason}")
        }
        ServerOutcome::ValidationFailed { diagnostics } => {
            println!("Configuration test failed, server not reloaded:\n{diagnostics}")
        }
    }
}
