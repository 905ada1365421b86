use std::env;
use std::time::Duration;

use crate::alerts::{ManagerConfig, DEFAULT_DISMISS_DELAY};
use crate::cli::Cli;
use crate::error::AppError;

/// How long the console renderer keeps an alert up before pressing it.
pub const DEFAULT_RENDER_HOLD: Duration = Duration::from_millis(750);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dismiss_delay: Duration,
    pub render_hold: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dismiss_delay: DEFAULT_DISMISS_DELAY,
            render_hold: DEFAULT_RENDER_HOLD,
        }
    }
}

impl Config {
    /// Read `ALERT_DISMISS_DELAY_MS` and `ALERT_RENDER_HOLD_MS`.
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        Ok(Self {
            dismiss_delay: millis(&lookup, "ALERT_DISMISS_DELAY_MS")?
                .unwrap_or(defaults.dismiss_delay),
            render_hold: millis(&lookup, "ALERT_RENDER_HOLD_MS")?
                .unwrap_or(defaults.render_hold),
        })
    }

    /// Command-line flags win over the environment.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(ms) = cli.dismiss_delay_ms {
            self.dismiss_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = cli.hold_ms {
            self.render_hold = Duration::from_millis(ms);
        }
        self
    }

    pub fn manager(&self) -> ManagerConfig {
        ManagerConfig {
            dismiss_delay: self.dismiss_delay,
        }
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, AppError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| AppError::Config(format!("{} must be a whole number of milliseconds, got {:?}", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_variables_use_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dismiss_delay, Duration::from_millis(300));
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("ALERT_DISMISS_DELAY_MS", "120"),
            ("ALERT_RENDER_HOLD_MS", " 40 "),
        ]))
        .unwrap();
        assert_eq!(config.dismiss_delay, Duration::from_millis(120));
        assert_eq!(config.render_hold, Duration::from_millis(40));
    }

    #[test]
    fn invalid_number_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("ALERT_DISMISS_DELAY_MS", "soon")])).unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.contains("ALERT_DISMISS_DELAY_MS")));
    }

    #[test]
    fn cli_flags_win_over_environment() {
        let cli = Cli::parse_from(["alert-queue", "--dismiss-delay-ms", "5"]);
        let config = Config::from_lookup(lookup(&[("ALERT_DISMISS_DELAY_MS", "120")]))
            .unwrap()
            .with_cli(&cli);
        assert_eq!(config.manager().dismiss_delay, Duration::from_millis(5));
        assert_eq!(config.render_hold, DEFAULT_RENDER_HOLD);
    }
}
