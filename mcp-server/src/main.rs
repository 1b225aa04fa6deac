use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use xoso_lookup::api::LotteryApi;
use xoso_lookup::config;
use xoso_lookup::ticket_reader::TicketReaderClient;
use xoso_mcp::{LotteryUseCase, MCPHandler, TicketUseCase, stdio};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(api = %config.api_base_url, "Ready to check some tickets.");

    let lottery_use_case = LotteryUseCase::new(LotteryApi::from_config(&config)?);
    let ticket_use_case = TicketUseCase::new(TicketReaderClient::from_config(&config)?);

    let handler = MCPHandler::new(Arc::new(lottery_use_case), Arc::new(ticket_use_case));

    let (reader, writer) = stdio();

    handler.serve(reader, writer).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    Ok(())
}
