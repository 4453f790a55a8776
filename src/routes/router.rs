use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::Method,
    routing::{MethodRouter, get, post},
};
use tower::{Layer, ServiceBuilder, util::MapRequest, util::MapRequestLayer};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info_span;

use crate::core::error;
use crate::core::state::AppState;
use crate::routes::fallback::{self, FallbackDispatcher};
use crate::routes::{auth, fixtures};

/// The static route table. Both the router and the fallback dispatcher are
/// derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Login,
    UserInfo,
    RefreshToken,
    ConstantRoutes,
    CustomError,
    ClientConfig,
}

impl Endpoint {
    pub(crate) const ALL: [Endpoint; 6] = [
        Endpoint::Login,
        Endpoint::UserInfo,
        Endpoint::RefreshToken,
        Endpoint::ConstantRoutes,
        Endpoint::CustomError,
        Endpoint::ClientConfig,
    ];

    pub(crate) fn method(self) -> Method {
        match self {
            Endpoint::Login | Endpoint::RefreshToken => Method::POST,
            Endpoint::UserInfo
            | Endpoint::ConstantRoutes
            | Endpoint::CustomError
            | Endpoint::ClientConfig => Method::GET,
        }
    }

    pub(crate) fn path(self) -> &'static str {
        match self {
            Endpoint::Login => "/auth/login",
            Endpoint::UserInfo => "/auth/getUserInfo",
            Endpoint::RefreshToken => "/auth/refreshToken",
            Endpoint::ConstantRoutes => "/route/getConstantRoutes",
            Endpoint::CustomError => "/auth/error",
            Endpoint::ClientConfig => "/api/config",
        }
    }

    /// Exact method + path match.
    pub(crate) fn resolve(method: &Method, path: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|endpoint| endpoint.method() == *method && endpoint.path() == path)
    }

    fn handler(self) -> MethodRouter<AppState> {
        let route = match self {
            Endpoint::Login => post(auth::login),
            Endpoint::UserInfo => get(auth::user_info),
            Endpoint::RefreshToken => post(auth::refresh_token),
            Endpoint::ConstantRoutes => get(fixtures::constant_routes),
            Endpoint::CustomError => get(auth::custom_error),
            Endpoint::ClientConfig => get(fixtures::client_config),
        };

        route.fallback(fallback::unsupported_method)
    }
}

/// Exact matches against the route table and nothing else.
pub(crate) fn canonical_routes(state: AppState) -> Router {
    Endpoint::ALL
        .into_iter()
        .fold(Router::<AppState>::new(), |router, endpoint| {
            router.route(endpoint.path(), endpoint.handler())
        })
        .with_state(state)
}

/// Canonical routes plus the fallback dispatcher and the ambient layers.
pub(crate) fn routes(state: AppState) -> Router {
    let dispatcher = FallbackDispatcher::new(
        canonical_routes(state.clone()),
        state.normalizer.clone(),
    );

    canonical_routes(state)
        .fallback(move |request: Request| dispatcher.clone().dispatch(request))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                        let matched_path = request
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str);

                        info_span!(
                            "request",
                            method = ?request.method(),
                            uri = %request.uri(),
                            matched_path,
                        )
                    }),
                )
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(error::handle_panic)),
        )
}

/// The full service: path normalization runs before the router sees the
/// request, so it can affect which route matches.
pub(crate) fn app(
    state: AppState,
) -> MapRequest<Router, impl FnMut(Request) -> Request + Clone + Send + Sync + 'static> {
    let normalizer = state.normalizer.clone();

    MapRequestLayer::new(move |request: Request| normalizer.rewrite(request))
        .layer(routes(state))
}
