/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (HTTP 層 / Bearer / Concurrency gate)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::{self, ConcurrencyGate, http::HttpLimits};
use crate::services::auth::TokenAuthenticator;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG=info,request_guard=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    // development では panic でプロセスごと落とす
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        concurrency_limit = config.concurrency_limit,
        token_ttl = ?config.auth_token_ttl,
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> AppState {
    // Config::from_lookup has already rejected an empty secret and a zero ttl.
    let auth = Arc::new(TokenAuthenticator::new(
        config.auth_secret.as_bytes(),
        config.auth_token_ttl,
    ));
    let gate = ConcurrencyGate::new(config.concurrency_limit);

    AppState::new(auth, gate)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    middleware::http::apply(router, HttpLimits::from(config))
}
