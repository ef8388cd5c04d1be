use clap::Parser;
use tracing_subscriber::EnvFilter;

use church_connect_api::cli::{utils::output_service_error, Cli, OutputFormat};
use church_connect_api::error::ServiceError;
use church_connect_api::{config::config, is_production};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, AWS_* and CDN_* are picked up
    let _ = dotenvy::dotenv();

    let default_level = if is_production!() { "info" } else { "church_connect_api=debug,info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting church-connect in {:?} mode", config().environment);

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = church_connect_api::cli::run(cli).await {
        match e.downcast_ref::<ServiceError>() {
            Some(service_error) => output_service_error(&output_format, service_error)?,
            None => match std::env::var("CLI_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            },
        }
        std::process::exit(1);
    }

    Ok(())
}
