//! Bearer token 検証 → Subject を extensions に入れる
//!
//! - `Authorization: Bearer <token>` 以外の形式は検証前に 401 で拒否する
//! - 検証は `TokenAuthenticator::validate` に任せ、ここでは HTTP の結果へ変換するだけ
//! - 成功時は `Subject` を request extensions に格納し、次の層へ渡す

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::Subject;
use crate::error::AppError;
use crate::services::auth::TokenAuthenticator;

const BEARER_PREFIX: &str = "Bearer ";

/// Protect every route of `router` with bearer authentication.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::bearer::apply(v1, auth.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply<S>(router: Router<S>, auth: Arc<TokenAuthenticator>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(auth, bearer_middleware))
}

pub async fn bearer_middleware(
    State(auth): State<Arc<TokenAuthenticator>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or(AppError::InvalidAuthorizationHeader)?;

    let subject = match auth.validate(token) {
        Ok(subject) => subject,
        Err(err) => {
            tracing::warn!(error = %err, "bearer token rejected");
            return Err(err.into());
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(Subject(subject));

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The prefix is matched exactly: no case folding and no extra whitespace.
/// The token must follow the prefix immediately.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty() && !token.starts_with(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn strips_exact_prefix() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("abc.def.ghi")), None);
        assert_eq!(bearer_token(&headers("bearer abc.def.ghi")), None);
        assert_eq!(bearer_token(&headers("BEARER abc.def.ghi")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer  abc.def.ghi")), None);
    }
}
