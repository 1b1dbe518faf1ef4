mod api;
mod middleware;
mod session;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, StaticData};
use crate::session::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = orienta_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = orienta_db::PoolConfig::from_app_config(&config);
    let pool = orienta_db::connect_pool(&config.database_url, pool_config).await?;
    orienta_db::run_migrations(&pool).await?;

    let data = StaticData {
        questions: orienta_core::load_questions(&config.questions_path)?,
        careers: orienta_core::load_careers(&config.careers_path)?,
        profiles: orienta_core::load_profiles(&config.profiles_path)?,
    };
    tracing::info!(
        questions = data.questions.questions.len(),
        "instrument data loaded"
    );

    let mailer = orienta_mail::build_mailer(config.mail.as_ref())?;
    let app = build_app(AppState {
        pool,
        data: Arc::new(data),
        sessions: SessionStore::new(),
        mailer: Arc::from(mailer),
        mail_timeout: Duration::from_secs(config.mail_timeout_secs),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
