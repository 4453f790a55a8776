use std::sync::Arc;

use crate::core::error::Error;
use crate::identity::IdentityStore;
use crate::token::{TokenCodec, TokenError, TokenPurpose};
use crate::types::Identity;
use crate::types::response::{TokenPair, UserInfo};
use crate::utils::auth::secrets_match;

/// Compared against when the username is unknown, so both failure paths do
/// the same work.
const DUMMY_SECRET: &str = "authmock-no-such-user";

/// Login, current-user lookup and token refresh. Holds no session state:
/// everything a request needs is in the presented token.
#[derive(Clone, Debug)]
pub(crate) struct AuthController {
    identities: Arc<IdentityStore>,
    codec: TokenCodec,
}

impl AuthController {
    pub(crate) fn new(identities: Arc<IdentityStore>, codec: TokenCodec) -> Self {
        Self { identities, codec }
    }

    pub(crate) fn login(&self, username: &str, password: &str) -> Result<TokenPair, Error> {
        let identity = self.identities.get_by_username(username);
        let expected = identity.map_or(DUMMY_SECRET, |identity| identity.secret.as_str());
        let password_matches = secrets_match(expected, password);

        let identity = match identity {
            Some(identity) if password_matches => identity,
            _ => {
                tracing::warn!("login rejected");
                return Err(Error::InvalidCredentials);
            }
        };

        tracing::info!(user = %identity.username, "login succeeded");

        self.issue_pair(identity)
    }

    pub(crate) fn user_info(&self, access_token: Option<&str>) -> Result<UserInfo, Error> {
        let token = access_token.ok_or(Error::NoCredentials)?;
        let identity = self.authenticate(token, TokenPurpose::Access)?;

        Ok(UserInfo {
            user_id: identity.subject_id.clone(),
            user_name: identity.username.clone(),
            roles: identity.roles.clone(),
            buttons: identity.buttons.clone(),
        })
    }

    /// Mints a new pair for the subject of a refresh token. The presented
    /// token stays usable until its own expiry.
    pub(crate) fn refresh(&self, refresh_token: Option<&str>) -> Result<TokenPair, Error> {
        let token = refresh_token
            .filter(|token| !token.is_empty())
            .ok_or(Error::MissingField("refreshToken"))?;
        let identity = self.authenticate(token, TokenPurpose::Refresh)?;

        tracing::info!(user = %identity.username, "token refreshed");

        self.issue_pair(identity)
    }

    /// Decodes `token`, checks it was issued for `expected` and resolves its
    /// subject against the store.
    fn authenticate(&self, token: &str, expected: TokenPurpose) -> Result<&Identity, Error> {
        let claims = self.codec.decode(token).map_err(|e| match e {
            TokenError::Expired => Error::ExpiredToken(expected),
            TokenError::InvalidSignature => Error::InvalidToken(expected),
        })?;

        if claims.purpose != expected {
            return Err(Error::WrongTokenPurpose { expected });
        }

        self.identities
            .get_by_subject(&claims.sub)
            .ok_or(Error::UnknownSubject(claims.sub))
    }

    fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, Error> {
        Ok(TokenPair {
            token: self.codec.issue(identity, TokenPurpose::Access)?,
            refresh_token: self.codec.issue(identity, TokenPurpose::Refresh)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret", Duration::hours(24), Duration::days(7))
    }

    fn controller() -> AuthController {
        AuthController::new(Arc::new(IdentityStore::seeded().unwrap()), codec())
    }

    #[test]
    fn test_every_identity_can_log_in() {
        let controller = controller();
        let store = IdentityStore::seeded().unwrap();

        for identity in store.iter() {
            let pair = controller
                .login(&identity.username, &identity.secret)
                .unwrap();
            let info = controller.user_info(Some(pair.token.as_str())).unwrap();

            assert_eq!(info.user_id, identity.subject_id);
            assert_eq!(info.user_name, identity.username);
            assert_eq!(info.roles, identity.roles);
            assert_eq!(info.buttons, identity.buttons);
        }
    }

    #[test]
    fn test_bad_password_and_unknown_user_look_the_same() {
        let controller = controller();

        let wrong_password = controller.login("Admin", "nope").unwrap_err();
        let unknown_user = controller.login("Nobody", "123456").unwrap_err();

        assert!(matches!(wrong_password, Error::InvalidCredentials));
        assert!(matches!(unknown_user, Error::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(wrong_password.code(), unknown_user.code());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(matches!(
            controller().login("", ""),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn test_user_info_requires_token() {
        assert!(matches!(
            controller().user_info(None),
            Err(Error::NoCredentials)
        ));
    }

    #[test]
    fn test_user_info_rejects_expired_access_token() {
        let controller = controller();
        let store = IdentityStore::seeded().unwrap();
        let admin = store.get_by_username("Admin").unwrap();
        let token = codec()
            .issue_at(admin, TokenPurpose::Access, Utc::now() - Duration::hours(25))
            .unwrap();

        assert!(matches!(
            controller.user_info(Some(token.as_str())),
            Err(Error::ExpiredToken(TokenPurpose::Access))
        ));
    }

    #[test]
    fn test_user_info_rejects_garbage() {
        assert!(matches!(
            controller().user_info(Some("garbage")),
            Err(Error::InvalidToken(TokenPurpose::Access))
        ));
    }

    #[test]
    fn test_user_info_rejects_refresh_token() {
        let controller = controller();
        let pair = controller.login("Admin", "123456").unwrap();

        assert!(matches!(
            controller.user_info(Some(pair.refresh_token.as_str())),
            Err(Error::WrongTokenPurpose {
                expected: TokenPurpose::Access
            })
        ));
    }

    #[test]
    fn test_refresh_issues_a_new_pair() {
        let controller = controller();
        let pair = controller.login("User", "123456").unwrap();

        let refreshed = controller.refresh(Some(pair.refresh_token.as_str())).unwrap();
        let info = controller.user_info(Some(refreshed.token.as_str())).unwrap();
        assert_eq!(info.user_name, "User");

        // the presented refresh token is not consumed
        assert!(controller.refresh(Some(pair.refresh_token.as_str())).is_ok());
        assert!(controller.refresh(Some(refreshed.refresh_token.as_str())).is_ok());
    }

    #[test]
    fn test_refresh_rejects_access_token() {
        let controller = controller();
        let pair = controller.login("Admin", "123456").unwrap();

        assert!(matches!(
            controller.refresh(Some(pair.token.as_str())),
            Err(Error::WrongTokenPurpose {
                expected: TokenPurpose::Refresh
            })
        ));
    }

    #[test]
    fn test_refresh_requires_token() {
        let controller = controller();

        assert!(matches!(
            controller.refresh(None),
            Err(Error::MissingField("refreshToken"))
        ));
        assert!(matches!(
            controller.refresh(Some("")),
            Err(Error::MissingField("refreshToken"))
        ));
    }

    #[test]
    fn test_refresh_rejects_expired_and_invalid() {
        let controller = controller();
        let store = IdentityStore::seeded().unwrap();
        let admin = store.get_by_username("Admin").unwrap();
        let expired = codec()
            .issue_at(admin, TokenPurpose::Refresh, Utc::now() - Duration::days(8))
            .unwrap();

        assert!(matches!(
            controller.refresh(Some(expired.as_str())),
            Err(Error::ExpiredToken(TokenPurpose::Refresh))
        ));
        assert!(matches!(
            controller.refresh(Some("x.y.z")),
            Err(Error::InvalidToken(TokenPurpose::Refresh))
        ));
    }

    #[test]
    fn test_unknown_subject() {
        let controller = controller();
        let ghost = Identity::new("99", "Ghost", "x", &["user"], &[]);
        let token = codec().issue(&ghost, TokenPurpose::Access).unwrap();

        assert!(matches!(
            controller.user_info(Some(token.as_str())),
            Err(Error::UnknownSubject(sub)) if sub == "99"
        ));
    }

    #[test]
    fn test_session_lifecycle() {
        let controller = controller();
        let store = IdentityStore::seeded().unwrap();
        let admin = store.get_by_username("Admin").unwrap();
        let issued = Utc::now() - Duration::hours(30);
        let codec = codec();

        // access token has lapsed, refresh token is still good
        let access = codec.issue_at(admin, TokenPurpose::Access, issued).unwrap();
        let refresh = codec.issue_at(admin, TokenPurpose::Refresh, issued).unwrap();

        assert!(matches!(
            controller.user_info(Some(access.as_str())),
            Err(Error::ExpiredToken(TokenPurpose::Access))
        ));

        let pair = controller.refresh(Some(refresh.as_str())).unwrap();
        assert_eq!(
            controller.user_info(Some(pair.token.as_str())).unwrap().user_id,
            "3"
        );
    }
}
