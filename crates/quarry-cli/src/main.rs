use std::process::ExitCode;

use anyhow::Result;
use quarry_cli::{Cli, Outcome};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quarry=info,warn")),
        )
        .init();

    let cli = Cli::parse_from_env();

    match cli.run().await? {
        Outcome::Success(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failure(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
