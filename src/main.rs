use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use kopeck::money::Extractor;
use kopeck::server;
use kopeck::settings::Settings;

#[tokio::main]
async fn main() -> kopeck::Result<()> {
    // first argument, if any, is the settings file
    let path = std::env::args().nth(1);
    let settings = Settings::load(path.as_deref())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let extractor = Arc::new(Extractor::new(settings.tagger()?));
    let listener = tokio::net::TcpListener::bind(&settings.listen).await?;
    info!(listen = %settings.listen, forms = extractor.tagger().len(), workers = settings.workers, "kopeck listening");
    axum::serve(listener, server::router(extractor, settings.workers))
        .await
        .map_err(|e| kopeck::KopeckError::Server(e.to_string()))?;
    Ok(())
}
