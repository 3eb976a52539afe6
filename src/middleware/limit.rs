//! Concurrency gate (admission control).
//!
//! Responsibility:
//! - この層を同時に通過できるリクエスト数を `limit` 件までに制限する
//! - 空きがなければ待たせずに 429 を返す (queueing しない)
//!
//! Notes:
//! - Slots are `tokio::sync::Semaphore` permits taken with `try_acquire_owned`.
//!   A blocking `acquire` would turn the gate into an unbounded wait queue.
//! - The permit lives in the middleware future, so it is released on every
//!   exit path: normal return, error response, panic unwind, or the future
//!   being dropped when the client goes away.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

/// One reserved slot. Dropping it frees the slot.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// `limit == 0` rejects everything. Limits above
    /// `Semaphore::MAX_PERMITS` are clamped to it.
    pub fn new(limit: usize) -> Self {
        let limit = limit.min(Semaphore::MAX_PERMITS);

        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn in_flight(&self) -> usize {
        self.limit - self.available()
    }

    /// Reserve a slot without waiting. `None` means the gate is full.
    pub fn try_acquire(&self) -> Option<GatePermit> {
        self.semaphore
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| GatePermit { _permit: permit })
    }
}

/// Admit at most `gate.limit()` concurrent requests into `router`.
pub fn apply<S>(router: Router<S>, gate: ConcurrencyGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, limit_middleware))
}

pub async fn limit_middleware(
    State(gate): State<ConcurrencyGate>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(_permit) = gate.try_acquire() else {
        tracing::debug!(limit = gate.limit(), "concurrency limit reached");
        return Err(AppError::TooManyRequests);
    };

    Ok(next.run(req).await)
}
