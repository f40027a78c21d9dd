use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &castor::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        engine_base_url = %cfg.engine.base_url,
        engine_model = %cfg.engine.model,
        cli_fallback = cfg.engine.cli_fallback
    );

    let db = castor::db::spawn(&cfg.basic.database_url).await;

    let client = castor::server::router::build_engine_client(
        Duration::from_secs(cfg.engine.connect_timeout_secs),
        Duration::from_secs(cfg.engine.request_timeout_secs),
    );
    let engine: Arc<dyn castor::engine::ReviewEngine> =
        Arc::new(castor::engine::OllamaEngine::new(cfg.engine.clone(), client));

    let jobs = castor::jobs::spawn(db.clone(), engine.clone(), cfg.engine.categories.clone()).await;

    // Build axum router and serve
    let state = castor::server::router::CastorState::new(
        db,
        jobs,
        engine,
        cfg.engine.categories.clone(),
    );
    let app = castor::server::router::castor_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { /* ... */ },
        _ = terminate => { /* ... */ },
    }
}
