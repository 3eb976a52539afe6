//! Axum middleware for stateless bearer-token authentication and
//! bounded-concurrency admission control.
//!
//! - [`services::auth::TokenAuthenticator`] issues and validates HS256 tokens.
//! - [`middleware::auth::bearer`] rejects requests without a valid
//!   `Authorization: Bearer <token>` header and exposes the token subject
//!   through the [`api::v1::extractors::Subject`] extractor.
//! - [`middleware::limit::ConcurrencyGate`] answers 429 instead of queueing
//!   once `limit` requests are in flight.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
