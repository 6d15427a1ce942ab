mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::error;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone()) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Some(threads) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            error!("Failed to configure the thread pool: {e}");
            std::process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Annotate(args) => commands::annotate::run(args),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
