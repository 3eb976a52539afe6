/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::bearer (認証), limit (同時実行数の制限), http (横断的な HTTP 層)
 */
pub mod auth;
pub mod http;
pub mod limit;

pub use limit::ConcurrencyGate;
