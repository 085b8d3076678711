//! todomvc-e2e: run the TodoMVC behavioral suite
//!
//! ## Usage
//!
//! ```bash
//! todomvc-e2e run --base-url http://localhost:8888   # Run against a live page
//! todomvc-e2e run --driver memory                    # Run in-process
//! todomvc-e2e run --filter "edit" --report out.json  # Filter and save a report
//! todomvc-e2e list                                   # List scenario names
//! todomvc-e2e config                                 # Show effective config
//! ```

use clap::Parser;
use std::process::ExitCode;
use todomvc_e2e_cli::{handlers, logging, Cli, CliResult, Commands};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = handlers::build_config(&cli);
    logging::init(config.verbosity, config.color)?;

    match cli.command {
        Commands::Run(args) => handlers::execute_run(&config, &args),
        Commands::List(args) => handlers::execute_list(&config, &args),
        Commands::Config(args) => handlers::execute_config(&args),
    }
}
