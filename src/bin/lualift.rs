//! lualift CLI binary entry point.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lualift::cli::{run_detect, run_rename};
use lualift::error::LiftError;

/// Semantic identifier renaming for obfuscated Lua source.
#[derive(Parser)]
#[command(name = "lualift")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename obfuscated identifiers and print the rewritten source.
    Rename {
        /// Input file, or "-" for stdin
        #[arg(default_value = "-")]
        file: String,

        /// Emit a JSON envelope with the mapping and summary
        #[arg(long)]
        json: bool,
    },

    /// Print the inferred rename map without applying it.
    Detect {
        /// Input file, or "-" for stdin
        #[arg(default_value = "-")]
        file: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("LUALIFT_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Rename { file, json } => run_rename(&file, json),
        Commands::Detect { file } => run_detect(&file),
    };

    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn report_error(err: &LiftError) -> ExitCode {
    let code = err.error_code();
    eprintln!(
        "{{\"status\":\"error\",\"error\":{{\"code\":{},\"message\":\"{}\"}}}}",
        code,
        err.to_string().replace('"', "\\\"")
    );
    ExitCode::from(code.code())
}
