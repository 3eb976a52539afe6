/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: TokenAuthenticator (読み取り専用, Arc で共有)
 *   - gate: ConcurrencyGate (内部は Arc<Semaphore>)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::middleware::ConcurrencyGate;
use crate::services::auth::TokenAuthenticator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<TokenAuthenticator>,
    pub gate: ConcurrencyGate,
}

impl AppState {
    pub fn new(auth: Arc<TokenAuthenticator>, gate: ConcurrencyGate) -> Self {
        Self { auth, gate }
    }
}
