use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use ob_aggregator::app;
use ob_aggregator::cli::Cli;
use ob_aggregator::settings::Settings;
use ob_aggregator::telemetry;

// Single-threaded: the two venue fetches interleave on one task
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // load .env
    telemetry::init_tracing(LevelFilter::INFO);

    let cli = Cli::parse();
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let conclusion = app::execute(&settings, cli.qty.as_deref()).await;
    for line in &conclusion.stdout {
        println!("{line}");
    }
    if let Some(message) = &conclusion.stderr {
        eprintln!("{message}");
    }
    conclusion.exit_code()
}
