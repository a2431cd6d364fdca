mod commands;
mod config;
mod correction;
mod diagnostics;
mod error;
mod info;
mod loader;
mod merger;
mod namespace;
mod repair;
mod resolver;
mod scanner;
mod services;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apimerge", about = "Merge per-service Swagger documents into one unified API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge all service documents and write the unified API
    Merge {
        /// Directory containing *.swagger.json files
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Where to write the unified document
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Repair references in an existing unified document
    FixRefs {
        /// Unified document to repair in place
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Verify every reference resolves to a definition
    Check {
        /// Unified document to check
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Manage the correction table in .apimerge.toml
    Correction {
        #[command(subcommand)]
        command: CorrectionCommands,
    },
    /// Print the reference document and current state
    Info {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CorrectionCommands {
    /// List all corrections, built-in and configured
    List,
    /// Add a correction to .apimerge.toml
    Add {
        /// The dangling reference name to rewrite
        from: String,
        /// The definition it should point at
        to: String,
    },
    /// Remove a configured correction
    Remove {
        /// The configured reference name to drop
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}

fn run(command: Commands) -> Result<ExitCode, error::Error> {
    match command {
        Commands::Merge { dir, output } => {
            commands::merge(dir, output)?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::FixRefs { file } => {
            commands::fix_refs(file)?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Check { file } => commands::check(file),
        Commands::Correction { command } => {
            match command {
                CorrectionCommands::List => correction::cmd_list()?,
                CorrectionCommands::Add { from, to } => correction::cmd_add(&from, &to)?,
                CorrectionCommands::Remove { name } => correction::cmd_remove(&name)?,
            }
            Ok(ExitCode::SUCCESS)
        },
        Commands::Info { json } => {
            info::run(json);
            Ok(ExitCode::SUCCESS)
        },
    }
}
