use axum::extract::{OriginalUri, Request};
use axum::http::Uri;
use axum::http::uri::PathAndQuery;
use regex::Regex;

use crate::core::error::ConfigError;

/// Strips the trailing `:<digits>` marker some clients append to request
/// paths, producing things like `/auth/login:3000?x=1`.
#[derive(Clone, Debug)]
pub(crate) struct PathNormalizer {
    suffix: Regex,
}

impl PathNormalizer {
    pub(crate) fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            // one or more `:<digits>` groups anchored at the end of the path
            suffix: Regex::new(r"(?::[0-9]+)+$")?,
        })
    }

    /// Returns the canonical form of a raw path-and-query. Only a suffix at
    /// the end of the path component is removed; the query string is kept
    /// as-is and a `:1` in the middle of a path is left alone.
    pub(crate) fn normalize(&self, raw: &str) -> String {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };

        let path = self.suffix.replace(path, "");

        match query {
            Some(query) => format!("{path}?{query}"),
            None => path.into_owned(),
        }
    }

    /// Rewrites a URI to its canonical form, or `None` if it already is.
    pub(crate) fn normalize_uri(&self, uri: &Uri) -> Option<Uri> {
        let raw = uri.path_and_query().map(PathAndQuery::as_str)?;
        let canonical = self.normalize(raw);

        if canonical == raw {
            return None;
        }

        let mut parts = uri.clone().into_parts();
        parts.path_and_query = Some(canonical.parse().ok()?);

        Uri::from_parts(parts).ok()
    }

    /// Ingress rewrite, applied to every request before routing. The URI the
    /// client sent stays available as [`OriginalUri`].
    pub(crate) fn rewrite(&self, request: Request) -> Request {
        let Some(canonical) = self.normalize_uri(request.uri()) else {
            return request;
        };

        tracing::debug!(from = %request.uri(), to = %canonical, "normalized request path");

        let (mut parts, body) = request.into_parts();
        if parts.extensions.get::<OriginalUri>().is_none() {
            parts.extensions.insert(OriginalUri(parts.uri.clone()));
        }
        parts.uri = canonical;

        Request::from_parts(parts, body)
    }
}
