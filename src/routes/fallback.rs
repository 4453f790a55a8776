use axum::Router;
use axum::extract::{OriginalUri, Request};
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;

use crate::core::error::Error;
use crate::routes::router::Endpoint;
use crate::utils::path::PathNormalizer;

/// Second chance for requests no route matched: normalize the path once,
/// look it up in the route table and, if it resolves, hand a rebuilt request
/// to the canonical router. The canonical router has no dispatcher of its
/// own, so there is never more than one redispatch.
#[derive(Clone)]
pub(crate) struct FallbackDispatcher {
    canonical: Router,
    normalizer: PathNormalizer,
}

impl FallbackDispatcher {
    pub(crate) fn new(canonical: Router, normalizer: PathNormalizer) -> Self {
        Self {
            canonical,
            normalizer,
        }
    }

    pub(crate) async fn dispatch(self, request: Request) -> Response {
        let Some(uri) = self.resolve(request.method(), request.uri()) else {
            let method = request.method().clone();
            let path = original_path(&request);

            return Error::NotFound { method, path }.into_response();
        };

        tracing::info!(
            method = %request.method(),
            from = %request.uri(),
            to = %uri,
            "redispatching"
        );

        let (mut parts, body) = request.into_parts();
        parts.uri = uri;

        match self.canonical.oneshot(Request::from_parts(parts, body)).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    /// Canonical URI for the request, if the route table has a handler for it.
    fn resolve(&self, method: &Method, uri: &Uri) -> Option<Uri> {
        let canonical = self
            .normalizer
            .normalize_uri(uri)
            .unwrap_or_else(|| uri.clone());

        Endpoint::resolve(method, canonical.path()).map(|_| canonical)
    }
}

/// The path as the client sent it, before any ingress rewrite.
fn original_path(request: &Request) -> String {
    request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.path().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned())
}

/// Answers a known path requested with the wrong method.
pub(crate) async fn unsupported_method(method: Method, OriginalUri(uri): OriginalUri) -> Error {
    Error::NotFound {
        method,
        path: uri.path().to_owned(),
    }
}
