mod config;
mod error;
mod llm;
mod models;
mod prompts;
mod routes;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

use config::{LogFormat, Settings};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env().expect("invalid configuration");
    init_tracing(&settings);

    tracing::info!(
        environment = %settings.environment,
        default_provider = %settings.default_provider,
        prompts_dir = %settings.prompts_dir.display(),
        "summary service configured"
    );

    let addr = settings.bind_addr();
    let state = state::AppState::from_settings(settings);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "summary service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

/// `RUST_LOG` wins over `LOG_LEVEL` when set.
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_filter()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match settings.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
