use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use subtle::ConstantTimeEq;

use crate::core::error::Error;

/// Token presented in the `Authorization` header, if there was a header at
/// all. A header without the `Bearer ` prefix is passed through as-is and
/// fails signature verification downstream.
#[derive(Debug)]
pub(crate) struct BearerToken(pub(crate) Option<String>);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Self(None));
        };

        // an unreadable header is still a header; hand the verifier something
        // it will reject
        let value = value.to_str().unwrap_or_default().trim();
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

        Ok(Self(Some(token.to_owned())))
    }
}

/// Compares secrets without short-circuiting on the first differing byte.
pub(crate) fn secrets_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
