use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seatmap::{
    app,
    config::{Config, LogFormat, StorageBackend},
    storage::{FileStore, KeyValueStore, MemoryStore},
    AppState,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(&config.app.rust_log);
    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn open_storage(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let storage: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(&config.storage.path)),
        #[cfg(feature = "redis-store")]
        StorageBackend::Redis => {
            let url = config
                .storage
                .redis_url
                .as_deref()
                .context("REDIS_URL must be set")?;
            let preload = [config.selection.storage_key.as_str()];
            let store = seatmap::storage::RedisStore::connect(url, &preload)
                .await
                .context("Failed to connect to Redis")?;
            Arc::new(store)
        }
        #[cfg(not(feature = "redis-store"))]
        StorageBackend::Redis => anyhow::bail!("built without the redis-store feature"),
    };
    Ok(storage)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Invalid configuration")?;
    init_tracing(&config);

    info!("Starting Seatmap API ({})", config.app.environment);

    let storage = open_storage(&config).await?;
    info!("Selection storage ready: {:?}", config.storage.backend);

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("HOST/PORT do not form a socket address")?;

    let state = AppState::new(config, storage);

    // Площадка грузится в фоне, до этого API отвечает 503
    state.spawn_venue_load();

    let router = app(state.clone());

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
