use serde::Serialize;

pub(crate) const SUCCESS_CODE: &str = "0000";

/// Every response body, success or failure, has this shape.
#[derive(Debug, Serialize)]
pub(crate) struct Envelope<T> {
    pub(crate) code: String,
    pub(crate) msg: String,
    pub(crate) data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub(crate) fn ok(msg: &str, data: T) -> Self {
        Self {
            code: SUCCESS_CODE.to_owned(),
            msg: msg.to_owned(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenPair {
    pub(crate) token: String,
    pub(crate) refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserInfo {
    pub(crate) user_id: String,
    pub(crate) user_name: String,
    pub(crate) roles: Vec<String>,
    pub(crate) buttons: Vec<String>,
}
