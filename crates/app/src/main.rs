mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "taproom={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let engine = match engine::Engine::builder()
        .price_per_unit(settings.pricing.price_per_unit)
        .build()
    {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!("failed to build engine: {err}");
            return Err(err.into());
        }
    };

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}
