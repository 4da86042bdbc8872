//! modelgen CLI
//!
//! Runs the build-script generator outside Cargo, for CI staleness checks
//! and for looking at what a crate's markers resolve to.
//!
//! ```bash
//! modelgen generate --src src --out target/modelgen
//! modelgen generate --check
//! modelgen inspect --src src
//! ```

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Command::Generate(args) => commands::generate(args),
        Command::Inspect(args) => commands::inspect(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(target: "modelgen", "{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
