//! rafs-reindex CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Commands};
use rafs_reindex::{JobError, EXIT_CONFIG, EXIT_FAILURE};
use rafs_reindex_secrets::sanitize_error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    let result = match cli.command {
        None => commands::run::run(cli.run, config)
            .await
            .map_err(anyhow::Error::from),
        Some(Commands::Run(args)) => commands::run::run(args, config)
            .await
            .map_err(anyhow::Error::from),
        Some(Commands::Config(cmd)) => commands::config::run(cmd, config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code(&err);
            match err.downcast_ref::<JobError>() {
                Some(job_err) => error!(
                    stage = job_err.stage(),
                    "Reindex job failed: {}",
                    sanitize_error(&job_err.to_string())
                ),
                None => error!("{}", sanitize_error(&format!("{:#}", err))),
            }
            ExitCode::from(code)
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(job_err) = err.downcast_ref::<JobError>() {
        return job_err.exit_code();
    }
    if err.downcast_ref::<rafs_reindex_core::Error>().is_some() {
        return EXIT_CONFIG;
    }
    EXIT_FAILURE
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
