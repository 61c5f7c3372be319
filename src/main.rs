mod canonical;
mod commands;
mod config;
mod display;
mod error;
mod github;
mod logging;
mod report;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "dependabot-report",
    version,
    about = "Report open high and critical Dependabot alerts across a GitHub organization"
)]
pub struct Cli {
    /// Audit the organization configured as `secondary` instead of `primary`
    #[arg(long)]
    secondary: bool,

    /// Show verbose output (debug logging, run summary)
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(e) = commands::audit::run(cli.secondary, cli.verbose).await {
        display::error(&e.to_string());
        std::process::exit(1);
    }
}
