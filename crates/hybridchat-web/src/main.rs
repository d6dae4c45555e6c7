//! hybridchat server
//!
//! Run with: cargo run -p hybridchat-web

use hybridchat_llm::LlmRouter;
use hybridchat_web::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hybridchat=debug,info")),
        )
        .init();

    info!("Starting hybridchat {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let llm = LlmRouter::from_config(&config.llm)?;

    info!("Primary configured: {}", llm.primary_configured());
    if let Some(primary) = llm.primary() {
        info!("Primary: {} | model={}", config.llm.primary.base_url, primary.model_id());
    }
    info!("Secondary: {} | model={}", config.llm.secondary.base_url, config.llm.secondary.model);

    let state = hybridchat_web::state::AppState::new(llm, config.llm.secondary.base_url.clone());
    let app = hybridchat_web::router::build_router(state, &config.server);

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
