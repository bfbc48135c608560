//! Naoshi CLI
//!
//! Command-line interface for the Naoshi codemod toolkit

mod commands;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use naoshi_core::{NaoshiConfig, init_tracing};
use tracing::error;

#[derive(Parser)]
#[command(name = "naoshi")]
#[command(about = "Naoshi: migration toolkit for Hack/PHP source trees")]
#[command(version = naoshi_core::VERSION)]
#[command(
    long_about = "Naoshi applies named, repeatable migrations to Hack/PHP source files.\n\
Files are parsed into fully lossless syntax trees, so everything a migration\n\
does not touch round-trips byte for byte.\n\
\n\
Examples:\n  \
naoshi migrate src/                              # Preview all migrations\n  \
naoshi migrate --write src/                      # Rewrite files in place\n  \
naoshi migrate -m array-ref-in-foreach a.php     # Apply one migration\n  \
naoshi migrations                                # List available migrations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (naoshi.toml)"
    )]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations to files or directories
    Migrate {
        /// Files or directories to migrate (directories are walked recursively)
        paths: Vec<PathBuf>,

        /// Migration to apply (repeatable; default: all registered)
        #[arg(short, long = "migration", value_name = "NAME")]
        migrations: Vec<String>,

        /// Rewrite files in place instead of only reporting
        #[arg(long)]
        write: bool,
    },

    /// List available migrations and their steps
    Migrations,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Migrate {
            paths,
            migrations,
            write,
        } => {
            commands::migrate(
                &config,
                commands::MigrateOptions {
                    paths,
                    migrations,
                    write,
                },
            )
            .await
        }
        Commands::Migrations => {
            commands::list_migrations();
            Ok(0)
        }
    };

    match result {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<NaoshiConfig> {
    match path {
        Some(path) => {
            NaoshiConfig::load(path).with_context(|| format!("cannot load {}", path.display()))
        }
        None => {
            let cwd = std::env::current_dir().context("cannot determine working directory")?;
            Ok(NaoshiConfig::discover_or_default(cwd)?)
        }
    }
}
