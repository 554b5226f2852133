//! Nexus configuration CLI
//!
//! Normalizes repository manager configuration files and applies the
//! idempotent REST operations. Results are printed to stdout as JSON.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands, ComponentAction};
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute_command(cli.command) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);
    let result = if verbose {
        tracing::subscriber::set_global_default(builder.with_max_level(Level::DEBUG).with_target(true).finish())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())
    };

    if let Err(e) = result {
        eprintln!("{}: failed to install logger: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Normalize { target } => commands::run_normalize(target),
        Commands::Tokens {
            connection,
            state,
            required_for_auth,
            expire_tokens,
            expiration_days,
            check,
        } => commands::run_tokens(&connection, state, required_for_auth, expire_tokens, expiration_days, check),
        Commands::NodeInfo { connection } => commands::run_node_info(&connection),
        Commands::Component { action } => match action {
            ComponentAction::Upload { target, src } => commands::run_component_upload(&target, src),
            ComponentAction::Delete { target } => commands::run_component_delete(&target),
        },
        Commands::Download {
            state,
            version,
            arch,
            url,
            dest,
            timeout,
            insecure,
            check,
        } => commands::run_download(commands::DownloadArgs {
            state,
            version,
            arch,
            url,
            dest,
            timeout,
            insecure,
            check,
        }),
    }
}
