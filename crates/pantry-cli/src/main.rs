use clap::Parser;

use pantry_server::ProduceServer;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log)
        .init();

    let config = cli.resolve_config()?;
    ProduceServer::new(config).serve().await?;
    Ok(())
}
