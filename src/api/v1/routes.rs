/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし、/me は bearer + concurrency gate の内側
 * - layer は追加した時点の route にだけ掛かるので、公開 route は最後に merge する
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::middleware::{auth::bearer, limit};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new().route("/me", get(me));
    // gate を内側に置き、認証に失敗したリクエストは slot を消費しない
    let protected = limit::apply(protected, state.gate.clone());
    let protected = bearer::apply(protected, state.auth.clone());

    Router::new().route("/health", get(health)).merge(protected)
}
