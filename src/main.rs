//! Post Quality Scorer: binary entrypoint.
//! Boots the Axum HTTP server: config, collaborators, metrics, routes.

use anyhow::Context as _;
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use post_quality_scorer::{
    api::{self, AppState},
    collaborators::build_collaborators,
    metrics::Metrics,
    PostAnalyzer, ScoringConfig,
};

/// `SCORER_LOG_FORMAT=json` switches to JSON lines; compact otherwise.
const ENV_LOG_FORMAT: &str = "SCORER_LOG_FORMAT";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("post_quality_scorer=info,scorer=info,warn"));

    let json = std::env::var(ENV_LOG_FORMAT)
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    // The shuttle runtime may already have installed a subscriber.
    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        eprintln!("tracing subscriber already set, keeping the existing one");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ScoringConfig::from_env().context("loading scoring config")?;
    let collaborators =
        build_collaborators(&cfg.collaborators).context("building collaborators")?;
    let analyzer = PostAnalyzer::new(collaborators, cfg.weights, cfg.fusion_params());

    let mut router = api::create_router(AppState::new(analyzer));
    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = %e, "prometheus recorder not installed, /metrics disabled"),
    }

    info!("post-quality-scorer ready");
    Ok(router.into())
}
