use capsuleer::server::{config::Config, error::Error, router, startup};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let session = startup::connect_to_session(&config).await?;
    let app_state = startup::build_app_state(&config).await?;

    let app = router::routes().with_state(app_state).layer(session);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!("Starting server on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
