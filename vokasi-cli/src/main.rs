use clap::Parser;
use vokasi_cli::{Assistant, Cli, repl, resolve_api_key};
use vokasi_telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (GOOGLE_API_KEY etc.) from .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_telemetry(cli.log_format, &cli.log_filter)?;

    let api_key = resolve_api_key(&cli.secrets_file)?;
    let assistant = Assistant::connect(&cli, &api_key).await?;

    repl::run(&assistant).await
}
