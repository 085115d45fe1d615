//! CVD CLI - Command line tool for building COVID-19 dashboard charts.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "cvd-cli",
    version,
    about = "COVID-19 dashboard data toolkit"
)]
struct Cli {
    #[command(flatten)]
    data: cvd_cmd::DataArgs,

    #[command(subcommand)]
    command: cvd_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cvd_cmd::run(&cli.data, cli.command).await
}
