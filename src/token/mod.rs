pub(crate) mod codec;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Identity, SubjectId, Username};

pub(crate) use codec::{TokenCodec, TokenError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    Access,
    Refresh,
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPurpose::Access => f.write_str("access"),
            TokenPurpose::Refresh => f.write_str("refresh"),
        }
    }
}

/// Payload of every issued token. Timestamps are Unix seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: SubjectId,
    #[serde(rename = "userName")]
    pub(crate) user_name: Username,
    pub(crate) roles: Vec<String>,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) purpose: TokenPurpose,
}

impl Claims {
    pub(crate) fn new(
        identity: &Identity,
        purpose: TokenPurpose,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: identity.subject_id.clone(),
            user_name: identity.username.clone(),
            roles: identity.roles.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
            purpose,
        }
    }
}
