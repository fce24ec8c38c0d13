use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;
use crate::types::Urgency;

use super::defaults::{default_notify_appname, default_urgency};
use super::env::{env_duration, env_parse, env_string};
use super::{Config, MillisOrHumantime, NotifySettings};

const MAX_TIMEOUT: Duration = Duration::from_millis(i32::MAX as u64);

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("PANELKIT")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) notify: RawNotify,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawNotify {
    #[serde(default = "default_notify_appname")]
    pub(super) appname: String,
    #[serde(default)]
    #[serde_as(as = "Option<MillisOrHumantime>")]
    pub(super) timeout: Option<Duration>,
    #[serde(default)]
    pub(super) urgency: Option<String>,
    #[serde(default)]
    pub(super) icon: Option<String>,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(appname) = env_string("NOTIFY_APPNAME")? {
            self.notify.appname = appname;
        }
        if let Some(timeout) = env_duration("NOTIFY_TIMEOUT")? {
            self.notify.timeout = Some(timeout);
        }
        if let Some(urgency) = env_parse::<Urgency>("NOTIFY_URGENCY")? {
            self.notify.urgency = Some(urgency.to_string());
        }
        if let Some(icon) = env_string("NOTIFY_ICON")? {
            self.notify.icon = Some(icon);
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let appname = self.notify.appname.trim().to_string();
        if appname.is_empty() {
            return Err(ConfigError::InvalidField {
                field: "notify.appname",
                message: "application name cannot be empty".to_string(),
            }
            .into());
        }

        let urgency = match self.notify.urgency.as_deref() {
            Some(raw) => Urgency::from_str(raw).map_err(|message| ConfigError::InvalidField {
                field: "notify.urgency",
                message,
            })?,
            None => default_urgency(),
        };

        if let Some(timeout) = self.notify.timeout {
            if timeout > MAX_TIMEOUT {
                return Err(ConfigError::InvalidField {
                    field: "notify.timeout",
                    message: format!(
                        "expected at most {} ms, got {} ms",
                        MAX_TIMEOUT.as_millis(),
                        timeout.as_millis()
                    ),
                }
                .into());
            }
        }

        let icon = self.notify.icon.filter(|icon| !icon.trim().is_empty());

        Ok(Config {
            notify: NotifySettings {
                appname,
                timeout: self.notify.timeout,
                urgency,
                icon,
            },
        })
    }
}

impl Default for RawNotify {
    fn default() -> Self {
        Self {
            appname: default_notify_appname(),
            timeout: None,
            urgency: None,
            icon: None,
        }
    }
}
