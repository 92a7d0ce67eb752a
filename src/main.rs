use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use travel_concierge::app;
use travel_concierge::config::AppConfig;
use travel_concierge::services::ai::ollama::OllamaProvider;
use travel_concierge::services::ai::openai::OpenAiProvider;
use travel_concierge::services::ai::LlmProvider;
use travel_concierge::services::travel::amadeus::AmadeusProvider;
use travel_concierge::state::{AppState, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    anyhow::ensure!(
        !config.amadeus_api_key.is_empty() && !config.amadeus_api_secret.is_empty(),
        "Amadeus API credentials not found: set AMADEUS_API_KEY and AMADEUS_API_SECRET"
    );

    let llm: Box<dyn LlmProvider> = match config.llm_provider.as_str() {
        "ollama" => {
            tracing::info!("using Ollama LLM provider (url: {})", config.ollama_url);
            Box::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
            ))
        }
        _ => {
            anyhow::ensure!(
                !config.openai_api_key.is_empty(),
                "OPENAI_API_KEY must be set when LLM_PROVIDER=openai"
            );
            tracing::info!("using OpenAI-compatible LLM provider (model: {})", config.openai_model);
            Box::new(OpenAiProvider::new(
                config.openai_api_key.clone(),
                config.openai_base_url.clone(),
                config.openai_model.clone(),
            ))
        }
    };

    let travel = AmadeusProvider::new(
        config.amadeus_api_key.clone(),
        config.amadeus_api_secret.clone(),
        config.amadeus_base_url.clone(),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        llm,
        travel: Box::new(travel),
        clock: Box::new(SystemClock),
    });

    let app = app::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
