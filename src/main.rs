use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
