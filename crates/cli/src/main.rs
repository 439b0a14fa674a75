use clap::Parser;
use telemetry::TelemetrySubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    if args.pretty_logs {
        std::env::set_var("COHORT_PRETTY_PRINT_LOGS", "true");
    }

    TelemetrySubscriber::init(std::io::stdout)?;

    cli::run(args).await?;

    Ok(())
}
