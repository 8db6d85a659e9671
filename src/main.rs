use specter::config::Config;
use specter::{app, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "specter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        "Starting Specter on {}:{} (source: {:?}, features: {:?})",
        config.host, config.port, config.data_source, config.feature_set
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::from_config(config);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Specter server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
