/*
 * Responsibility
 * - 認証済みリクエストの subject を handler に渡す型
 * - bearer middleware が request extensions に insert し、handler はこの型だけを受け取る
 *
 * Notes
 * - extension が無い (middleware を通っていない) 場合は空文字の subject として扱う
 */
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Subject carried by the validated bearer token. Empty when none was set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject(pub String);

impl Subject {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S> FromRequestParts<S> for Subject
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Subject>().cloned().unwrap_or_default())
    }
}
