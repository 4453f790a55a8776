use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

/// JSON body that never rejects. An empty, unreadable or non-JSON body
/// yields `T::default()`, leaving the handler's own missing-field checks to
/// decide what to report.
#[derive(Debug)]
pub(crate) struct LenientJson<T>(pub(crate) T);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(rejection) => {
                tracing::debug!("ignoring unreadable body: {}", rejection);
                return Ok(Self(T::default()));
            }
        };

        if bytes.is_empty() {
            return Ok(Self(T::default()));
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Self(value)),
            Err(e) => {
                tracing::debug!("ignoring unparseable body: {}", e);
                Ok(Self(T::default()))
            }
        }
    }
}
