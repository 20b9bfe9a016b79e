//! Backend entry-point: loads settings, selects the document store and
//! serves the REST API.

mod server;

use std::sync::Arc;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use showcase::inbound::http::health::HealthState;
use showcase::outbound::persistence::{MemoryStore, MongoStore};
use showcase::outbound::security::JwtTokenService;
use showcase::settings::ShowcaseSettings;

use server::state_builders::build_http_state;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ShowcaseSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    let bind_addr = settings.bind_addr()?;
    let tokens = Arc::new(JwtTokenService::new(
        settings.signing_secret()?,
        settings.token_ttl()?,
        Arc::new(DefaultClock),
    )?);

    let http_state = match settings.mongodb_uri.as_deref() {
        Some(uri) => {
            let store = MongoStore::connect(uri, settings.mongodb_database())
                .await
                .wrap_err("failed to connect to MongoDB")?;
            build_http_state(Arc::new(store), tokens)
        }
        None => {
            warn!("SHOWCASE_MONGODB_URI is not set; using the in-memory document store");
            build_http_state(Arc::new(MemoryStore::new()), tokens)
        }
    };

    let config = ServerConfig::new(bind_addr);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(
        PrometheusMetricsBuilder::new("showcase")
            .endpoint("/metrics")
            .build()
            .map_err(|e| eyre!("failed to configure Prometheus metrics: {e}"))?,
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}
