// ovrcast entry point.
//
// 1. Parse arguments
// 2. Initialize tracing (stderr, so stdout carries only command output)
// 3. Load config and fetch the run's snapshot
// 4. Dispatch the subcommand and print its output

use clap::Parser;
use ovrcast_app::cli::Cli;
use ovrcast_app::commands;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    match commands::run(cli).await {
        Ok(output) => print!("{output}"),
        Err(err) => {
            error!(error = %err, "command failed");
            for cause in err.chain().skip(1) {
                error!(cause = %cause, "caused by");
            }
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ovrcast=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
