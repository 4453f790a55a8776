use chrono::Duration;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

pub(crate) const ENV_PREFIX: &str = "AUTHMOCK";
pub(crate) const CONFIG_FILE: &str = "authmock";

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Args {
    pub(crate) port: u16,
    pub(crate) secret: String,
    pub(crate) log_level: String,
    /// seconds
    pub(crate) access_token_ttl: i64,
    /// seconds
    pub(crate) refresh_token_ttl: i64,
    pub(crate) service_base_url: String,
    pub(crate) other_service_base_url: String,
    pub(crate) success_code: String,
    pub(crate) logout_codes: String,
    pub(crate) modal_logout_codes: String,
    pub(crate) expired_token_codes: String,
}

/// Settings handed to the frontend by `/api/config`. The service itself
/// does not interpret them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClientSettings {
    pub(crate) service_base_url: String,
    pub(crate) other_service_base_url: serde_json::Map<String, serde_json::Value>,
    pub(crate) success_code: String,
    pub(crate) logout_codes: Vec<String>,
    pub(crate) modal_logout_codes: Vec<String>,
    pub(crate) expired_token_codes: Vec<String>,
}

pub(crate) fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("port", 3000_i64)?
        .set_default("secret", "authmock-secret-key")?
        .set_default("log_level", "info")?
        .set_default("access_token_ttl", Duration::hours(24).num_seconds())?
        .set_default("refresh_token_ttl", Duration::days(7).num_seconds())?
        .set_default("service_base_url", "http://localhost:3000")?
        .set_default("other_service_base_url", "{}")?
        .set_default("success_code", "0000")?
        .set_default("logout_codes", "1002,1005")?
        .set_default("modal_logout_codes", "1003,1008")?
        .set_default("expired_token_codes", "1004")?)
}

impl Args {
    /// Defaults, then an optional `authmock.toml`, then `AUTHMOCK_*`
    /// environment variables.
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let builder = defaults()?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX));

        Self::from_builder(builder)
    }

    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let args = builder.build()?.try_deserialize::<Args>()?;
        args.validate()?;

        Ok(args)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "secret",
                reason: "must not be empty".into(),
            });
        }

        if self.access_token_ttl <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "access_token_ttl",
                reason: format!(
                    "expected a positive number of seconds, got {}",
                    self.access_token_ttl
                ),
            });
        }

        if self.refresh_token_ttl <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "refresh_token_ttl",
                reason: format!(
                    "expected a positive number of seconds, got {}",
                    self.refresh_token_ttl
                ),
            });
        }

        Ok(())
    }

    pub(crate) fn access_lifetime(&self) -> Duration {
        Duration::seconds(self.access_token_ttl)
    }

    pub(crate) fn refresh_lifetime(&self) -> Duration {
        Duration::seconds(self.refresh_token_ttl)
    }

    pub(crate) fn client_settings(&self) -> Result<ClientSettings, ConfigError> {
        let other_service_base_url = match serde_json::from_str(&self.other_service_base_url) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => {
                return Err(ConfigError::InvalidValue {
                    key: "other_service_base_url",
                    reason: "expected a JSON object".into(),
                });
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    key: "other_service_base_url",
                    reason: e.to_string(),
                });
            }
        };

        Ok(ClientSettings {
            service_base_url: self.service_base_url.clone(),
            other_service_base_url,
            success_code: self.success_code.clone(),
            logout_codes: split_codes(&self.logout_codes),
            modal_logout_codes: split_codes(&self.modal_logout_codes),
            expired_token_codes: split_codes(&self.expired_token_codes),
        })
    }
}

fn split_codes(codes: &str) -> Vec<String> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_owned)
        .collect()
}
