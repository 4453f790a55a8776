use std::collections::HashMap;

use crate::core::error::ConfigError;
use crate::types::Identity;

/// Read-only set of mock accounts, indexed by username and by subject id.
#[derive(Debug)]
pub(crate) struct IdentityStore {
    identities: Vec<Identity>,
    by_username: HashMap<String, usize>,
    by_subject: HashMap<String, usize>,
}

impl IdentityStore {
    pub(crate) fn new(identities: Vec<Identity>) -> Result<Self, ConfigError> {
        let mut by_username = HashMap::with_capacity(identities.len());
        let mut by_subject = HashMap::with_capacity(identities.len());

        for (index, identity) in identities.iter().enumerate() {
            if by_username.insert(identity.username.clone(), index).is_some() {
                return Err(ConfigError::InvalidValue {
                    key: "identities",
                    reason: format!("duplicate username {}", identity.username),
                });
            }

            if by_subject.insert(identity.subject_id.clone(), index).is_some() {
                return Err(ConfigError::InvalidValue {
                    key: "identities",
                    reason: format!("duplicate subject id {}", identity.subject_id),
                });
            }
        }

        Ok(Self {
            identities,
            by_username,
            by_subject,
        })
    }

    /// The fixed accounts the mock ships with.
    pub(crate) fn seeded() -> Result<Self, ConfigError> {
        Self::new(vec![
            Identity::new("1", "Soybean", "123456", &["super"], &["btn1", "btn2", "btn3"]),
            Identity::new("2", "Super", "123456", &["super"], &["btn1", "btn2", "btn3"]),
            Identity::new("3", "Admin", "123456", &["admin"], &["btn1", "btn2"]),
            Identity::new("4", "User", "123456", &["user"], &["btn1"]),
        ])
    }

    pub(crate) fn get_by_username(&self, username: &str) -> Option<&Identity> {
        self.by_username
            .get(username)
            .map(|&index| &self.identities[index])
    }

    pub(crate) fn get_by_subject(&self, subject_id: &str) -> Option<&Identity> {
        self.by_subject
            .get(subject_id)
            .map(|&index| &self.identities[index])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.identities.iter()
    }
}
