use axum::Json;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request;
use crate::types::response::{Envelope, TokenPair, UserInfo};
use crate::utils::auth::BearerToken;
use crate::utils::extract::LenientJson;

const DEFAULT_ERROR_CODE: &str = "9999";
const DEFAULT_ERROR_MSG: &str = "Custom error";

#[instrument(skip_all)]
pub(crate) async fn login(
    State(state): State<AppState>,
    LenientJson(params): LenientJson<request::LoginData>,
) -> Result<Json<Envelope<TokenPair>>, Error> {
    let pair = state.auth_controller.login(
        params.user_name.as_deref().unwrap_or_default(),
        params.password.as_deref().unwrap_or_default(),
    )?;

    Ok(Json(Envelope::ok("Login succeeded", pair)))
}

#[instrument(skip_all)]
pub(crate) async fn user_info(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Envelope<UserInfo>>, Error> {
    let info = state.auth_controller.user_info(token.as_deref())?;

    Ok(Json(Envelope::ok("User info fetched", info)))
}

#[instrument(skip_all)]
pub(crate) async fn refresh_token(
    State(state): State<AppState>,
    LenientJson(params): LenientJson<request::RefreshData>,
) -> Result<Json<Envelope<TokenPair>>, Error> {
    let pair = state
        .auth_controller
        .refresh(params.refresh_token.as_deref())?;

    Ok(Json(Envelope::ok("Token refreshed", pair)))
}

/// Echoes `code` and `msg` from the query string back as a 400, so clients
/// can exercise their error handling.
#[instrument(skip_all)]
pub(crate) async fn custom_error(
    RawQuery(query): RawQuery,
) -> (StatusCode, Json<Envelope<()>>) {
    let params: request::ErrorQuery = query
        .as_deref()
        .and_then(|query| serde_urlencoded::from_str(query).ok())
        .unwrap_or_default();

    let envelope = Envelope {
        code: non_empty(params.code).unwrap_or_else(|| DEFAULT_ERROR_CODE.to_owned()),
        msg: non_empty(params.msg).unwrap_or_else(|| DEFAULT_ERROR_MSG.to_owned()),
        data: None,
    };

    (StatusCode::BAD_REQUEST, Json(envelope))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
