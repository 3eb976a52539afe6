/*
 * Responsibility
 * - middleware が返す拒否レスポンスの定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - TokenError を HTTP の結果へ変換する (分類は services 側で完了している)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::TokenError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    // Missing and malformed headers share one outcome.
    #[error("missing or invalid Authorization header")]
    InvalidAuthorizationHeader,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    InvalidToken,
    #[error("unauthorized")]
    Unauthorized,
    #[error("too many requests")]
    TooManyRequests,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidAuthorizationHeader
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidAuthorizationHeader => "INVALID_AUTHORIZATION_HEADER",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::TooManyRequests => "TOO_MANY_REQUESTS",
            AppError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Invalid => AppError::InvalidToken,
            TokenError::Signing(_) => AppError::Unauthorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_map_to_distinct_outcomes() {
        assert!(matches!(AppError::from(TokenError::Expired), AppError::TokenExpired));
        assert!(matches!(AppError::from(TokenError::Invalid), AppError::InvalidToken));

        let signing = TokenError::Signing(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into());
        let fallback = AppError::from(signing);
        assert!(matches!(fallback, AppError::Unauthorized));
        assert_eq!(fallback.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(fallback.code(), "UNAUTHORIZED");
        assert_eq!(fallback.to_string(), "unauthorized");
    }

    #[test]
    fn admission_rejection_is_not_an_auth_failure() {
        assert_eq!(AppError::TooManyRequests.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
    }
}
