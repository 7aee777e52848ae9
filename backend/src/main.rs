use clinic_backend::{config::Config, create_router, initialize_backend};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_backend=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    info!("Listening on http://{}", config.addr());

    axum::serve(listener, app).await?;

    Ok(())
}
