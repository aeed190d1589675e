//! Configuration for the leadgate CLI.
//!
//! A TOML file layered with `LEADGATE_`-prefixed environment variables,
//! validated and translated to `leadgate_core::GuardConfig`. Nested keys
//! use a double underscore: `LEADGATE_GUARD__TAX_RATE=0.2`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use leadgate_core::GuardConfig;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LEADGATE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Business limits enforced by the guard.
    #[serde(default)]
    pub guard: GuardSettings,

    /// CLI presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GuardSettings {
    #[serde(default = "default_slot_capacity")]
    pub slot_capacity: usize,

    #[serde(default = "default_max_pending")]
    pub max_pending_per_email: usize,

    #[serde(default = "default_horizon")]
    pub booking_horizon_days: u32,

    #[serde(default = "default_max_attendees")]
    pub max_attendees: u32,

    /// Flat fee per enrollment, e.g. `"10.00"`.
    #[serde(default = "GuardConfig::default_platform_fee")]
    pub platform_fee: Decimal,

    /// Fraction, e.g. `"0.10"` for 10%.
    #[serde(default = "GuardConfig::default_tax_rate")]
    pub tax_rate: Decimal,

    #[serde(default = "default_spam_window")]
    pub spam_window_secs: u64,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            slot_capacity: default_slot_capacity(),
            max_pending_per_email: default_max_pending(),
            booking_horizon_days: default_horizon(),
            max_attendees: default_max_attendees(),
            platform_fee: GuardConfig::default_platform_fee(),
            tax_rate: GuardConfig::default_tax_rate(),
            spam_window_secs: default_spam_window(),
        }
    }
}

fn default_slot_capacity() -> usize {
    GuardConfig::DEFAULT_SLOT_CAPACITY
}
fn default_max_pending() -> usize {
    GuardConfig::DEFAULT_MAX_PENDING_PER_EMAIL
}
fn default_horizon() -> u32 {
    GuardConfig::DEFAULT_BOOKING_HORIZON_DAYS
}
fn default_max_attendees() -> u32 {
    GuardConfig::DEFAULT_MAX_ATTENDEES
}
fn default_spam_window() -> u64 {
    GuardConfig::DEFAULT_SPAM_WINDOW_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

// ── Validation & translation ────────────────────────────────────────

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.guard;
        if g.slot_capacity < 1 {
            return Err(invalid("guard.slot_capacity", "must be at least 1"));
        }
        if g.max_pending_per_email < 1 {
            return Err(invalid("guard.max_pending_per_email", "must be at least 1"));
        }
        if g.booking_horizon_days < 1 {
            return Err(invalid("guard.booking_horizon_days", "must be at least 1"));
        }
        if g.max_attendees < 1 {
            return Err(invalid("guard.max_attendees", "must be at least 1"));
        }
        check_platform_fee(g.platform_fee).map_err(|r| invalid("guard.platform_fee", &r))?;
        check_tax_rate(g.tax_rate).map_err(|r| invalid("guard.tax_rate", &r))?;
        Ok(())
    }

    /// The runtime limits handed to the guard.
    pub fn to_guard_config(&self) -> GuardConfig {
        let g = &self.guard;
        GuardConfig {
            slot_capacity: g.slot_capacity,
            max_pending_per_email: g.max_pending_per_email,
            booking_horizon_days: g.booking_horizon_days,
            max_attendees: g.max_attendees,
            platform_fee: g.platform_fee,
            tax_rate: g.tax_rate,
            spam_window: Duration::from_secs(g.spam_window_secs),
        }
    }
}

/// Platform fee bound, shared by the config file and command-line
/// overrides. The error is the reason text.
pub fn check_platform_fee(fee: Decimal) -> Result<(), String> {
    if fee < Decimal::ZERO {
        return Err("must not be negative".into());
    }
    Ok(())
}

/// Tax rate must be a fraction in `[0, 1)`.
pub fn check_tax_rate(rate: Decimal) -> Result<(), String> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(format!("must be in [0, 1), got {rate}"));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "leadgate", "leadgate").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("leadgate");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load and validate the config from file + environment.
///
/// `path` overrides the platform location. A missing file is not an
/// error: defaults and environment still apply.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it. Returns the path written.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    cfg.validate()?;
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn defaults_match_core() {
        let cfg = Config::default();
        assert_eq!(cfg.to_guard_config(), GuardConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let cfg = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
            assert_eq!(cfg, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_values_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "leadgate.toml",
                r#"
                [guard]
                slot_capacity = 4
                platform_fee = "12.50"
                tax_rate = "0.2"

                [defaults]
                output = "json"
                "#,
            )?;
            let cfg = load_config(Some(Path::new("leadgate.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.guard.slot_capacity, 4);
            assert_eq!(cfg.guard.max_pending_per_email, 3);
            assert_eq!(cfg.guard.platform_fee, dec("12.50"));
            assert_eq!(cfg.guard.tax_rate, dec("0.2"));
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.defaults.color, "auto");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("leadgate.toml", "[guard]\nslot_capacity = 4\n")?;
            jail.set_env("LEADGATE_GUARD__SLOT_CAPACITY", "6");
            jail.set_env("LEADGATE_GUARD__SPAM_WINDOW_SECS", "30");
            let cfg = load_config(Some(Path::new("leadgate.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.guard.slot_capacity, 6);
            assert_eq!(cfg.to_guard_config().spam_window, Duration::from_secs(30));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut cfg = Config::default();
        cfg.guard.slot_capacity = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "guard.slot_capacity"
        ));

        let mut cfg = Config::default();
        cfg.guard.tax_rate = dec("1.0");
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.guard.platform_fee = dec("-1");
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.guard.tax_rate = Decimal::ZERO;
        cfg.guard.platform_fee = Decimal::ZERO;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn pricing_bounds_are_shared() {
        assert!(check_platform_fee(Decimal::ZERO).is_ok());
        assert!(check_platform_fee(dec("-0.01")).is_err());
        assert!(check_tax_rate(dec("0.99")).is_ok());
        for rate in ["1", "5", "-0.1"] {
            let reason = check_tax_rate(dec(rate)).unwrap_err();
            assert!(reason.contains("[0, 1)"), "{reason}");
        }

        let mut cfg = Config::default();
        cfg.guard.tax_rate = dec("5");
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "guard.tax_rate"
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("config.toml");
            let mut cfg = Config::default();
            cfg.guard.booking_horizon_days = 30;
            cfg.defaults.color = "never".into();

            let written = save_config(&cfg, Some(&path)).unwrap();
            assert_eq!(written, path);
            assert_eq!(load_config(Some(&path)).unwrap(), cfg);
            Ok(())
        });
    }
}
