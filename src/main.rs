use clap::Parser;
use loantree::cli::args::Cli;
use loantree::cli::commands::execute_command;
use loantree::cli::output;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

/// `-d` count picks the loantree log level; `RUST_LOG` overrides it entirely.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,loantree={level}")));

    // stdout is reserved for session output
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity > 1)
                .with_span_events(if verbosity > 2 { FmtSpan::CLOSE } else { FmtSpan::NONE })
                .with_filter(filter),
        )
        .init();

    tracing::debug!("log level {}", level);
}
