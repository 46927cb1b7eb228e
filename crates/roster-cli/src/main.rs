mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{
    checkin, completions, import, normalize, participants, payments, serve, Context,
};
use crate::error::{exit_code_for, report_error};
use roster_config as config;
use roster_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(
    name = "roster",
    version,
    about = "Event participant registration and check-in"
)]
struct Cli {
    #[arg(long, global = true, env = "DATABASE_PATH")]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve(serve::ServeArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    /// Submit a registration the way the web form does
    Register(participants::RegisterArgs),
    Show(participants::ShowArgs),
    List(participants::ListArgs),
    Search(participants::SearchArgs),
    Count,
    Stats,
    /// Check whether someone is registered
    Check(checkin::CheckArgs),
    /// Check in from a scanned QR payload or a typed email/phone
    Scan(checkin::ScanArgs),
    #[command(subcommand)]
    Import(import::ImportCommand),
    #[command(subcommand)]
    Payment(payments::PaymentCommand),
    /// Show what the normalizer makes of a value
    #[command(subcommand)]
    Normalize(normalize::NormalizeCommand),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let default_level = match cli.command {
        Command::Serve(_) if !verbose => "info",
        _ if verbose => "debug",
        _ => "warn",
    };
    init_logging(default_level);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    if let Command::Normalize(cmd) = command {
        return normalize::run(&app_config, json, cmd);
    }

    let db_path =
        paths::resolve_db_path(db_path.as_deref()).with_context(|| "resolve database path")?;
    if verbose {
        debug!(path = %db_path.display(), "database path resolved");
    }

    let store = Store::open(&db_path)
        .with_context(|| format!("open database {}", db_path.display()))?
        .with_phone_policy(app_config.phone.clone());
    store.migrate().with_context(|| "run migrations")?;

    if let Command::Serve(args) = command {
        return serve::serve(store, &app_config, args);
    }

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::Register(args) => participants::register(&ctx, args),
        Command::Show(args) => participants::show(&ctx, args),
        Command::List(args) => participants::list(&ctx, args),
        Command::Search(args) => participants::search(&ctx, args),
        Command::Count => participants::count(&ctx),
        Command::Stats => participants::stats(&ctx),
        Command::Check(args) => checkin::check(&ctx, args),
        Command::Scan(args) => checkin::scan(&ctx, args),
        Command::Import(cmd) => match cmd {
            import::ImportCommand::Json(args) => import::import_json(&ctx, args),
            import::ImportCommand::Legacy(args) => import::import_legacy(&ctx, args),
        },
        Command::Payment(cmd) => match cmd {
            payments::PaymentCommand::Record(args) => payments::record(&ctx, args),
            payments::PaymentCommand::List(args) => payments::list(&ctx, args),
        },
        Command::Serve(_) => unreachable!("serve command handled before context creation"),
        Command::Completions(_) => {
            unreachable!("completions command handled before store initialization")
        }
        Command::Normalize(_) => {
            unreachable!("normalize command handled before store initialization")
        }
    }
}

fn init_logging(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
