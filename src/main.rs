use std::{net::Ipv4Addr, sync::Arc};

use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use watchlist::{config::Config, create_app, db, AppState};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the variables may come from the process environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("watchlist=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().expect("invalid configuration");

    let db = db::init_db(&config.db_path).expect("initializing database");
    info!(path = %config.db_path.display(), "opened database");

    let state = AppState {
        db,
        base_path: Arc::new(config.base_path),
    };
    let app = create_app(state);
    let addr = (Ipv4Addr::UNSPECIFIED, config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to port {}: {e}", config.port));

    info!("running on {addr:?}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("failed serving");

    info!("server stopped");
}

/// Resolves on Ctrl-C or SIGTERM, whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
