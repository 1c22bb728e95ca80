//! Storyline CLI - lint, size and revise user stories.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Lint {
            file,
            json,
            fix,
            output,
        } => commands::lint::run(file, json, fix, output, config, cli.verbose),

        Commands::Estimate {
            file,
            json,
            original_points,
        } => commands::estimate::run(file, json, original_points, config, cli.verbose),

        Commands::Diff {
            before,
            after,
            json,
        } => commands::diff::run(before, after, json, cli.verbose),

        Commands::Suggest {
            before,
            after,
            scope,
            field,
            model,
            temperature,
            retrieval,
            output,
        } => commands::suggest::run(
            before,
            after,
            scope,
            field,
            model,
            temperature,
            retrieval,
            output,
            cli.verbose,
        ),

        Commands::Apply {
            file,
            suggestion,
            output,
            undo,
        } => commands::apply::run(file, suggestion, output, undo, cli.verbose),

        Commands::Config { output } => commands::config::run(output, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `STORYLINE_LOG` or the verbosity flags.
fn init_tracing(quiet: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("STORYLINE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| format!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
