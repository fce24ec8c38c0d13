use std::path::Path;
use std::time::Duration;

use crate::Result;
use crate::error::Error as PanelError;
use crate::types::Urgency;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::MillisOrHumantime;

#[derive(Debug, Clone)]
pub struct Config {
    pub notify: NotifySettings,
}

/// Defaults applied to notifications sent by the CLI.
#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub appname: String,
    pub timeout: Option<Duration>,
    pub urgency: Urgency,
    pub icon: Option<String>,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be parsed, when
    /// environment overrides are invalid, or when the resulting values fail
    /// validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(PanelError::from)?;
        raw.apply_env_overrides().map_err(PanelError::from)?;
        raw.validate_and_build()
    }
}

impl NotifySettings {
    /// Timeout in the millisecond form notification daemons take, `0` when
    /// the daemon default should apply.
    #[must_use]
    pub fn timeout_ms(&self) -> i32 {
        self.timeout
            .and_then(|timeout| i32::try_from(timeout.as_millis()).ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::NotifySettings;
    use crate::types::Urgency;
    use std::time::Duration;

    #[test]
    fn timeout_ms_defaults_to_zero() {
        let mut settings = NotifySettings {
            appname: "panelkit".into(),
            timeout: None,
            urgency: Urgency::Normal,
            icon: None,
        };
        assert_eq!(settings.timeout_ms(), 0);
        settings.timeout = Some(Duration::from_millis(1_500));
        assert_eq!(settings.timeout_ms(), 1_500);
    }
}
