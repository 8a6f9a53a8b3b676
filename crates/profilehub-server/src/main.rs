mod api;
mod middleware;

use std::time::Duration;

use profilehub_gbp::{Aggregator, AggregatorSettings, BaseUrls, GbpClient};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = profilehub_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let base_urls = BaseUrls {
        accounts: config.accounts_base_url.clone(),
        business_info: config.business_info_base_url.clone(),
        v4: config.v4_base_url.clone(),
    };
    let client = GbpClient::with_base_urls(
        config.upstream_timeout_secs,
        &config.user_agent,
        &base_urls,
    )?;
    let aggregator = Aggregator::new(
        client,
        AggregatorSettings {
            region_code: config.region_code.clone(),
            language_code: config.language_code.clone(),
            category_name: config.category_name.clone(),
            reviews_page_size: config.reviews_page_size,
            deadline: Duration::from_millis(config.request_deadline_ms),
        },
    );

    let state = AppState::new(aggregator, Duration::from_secs(config.cache_ttl_secs));
    let app = build_app(state);

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting profilehub server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
