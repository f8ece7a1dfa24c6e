use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    /// Shared deadline for `$(...)` substitutions, in seconds.
    #[serde(default)]
    pub exec_timeout_secs: u64,
    /// Keep the temporary body file after the run.
    #[serde(default)]
    pub keep_body_file: bool,
    /// Level for messages on stderr (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default)]
    pub log_level: String,
    /// Run log; `~` is expanded. Empty disables it.
    #[serde(default)]
    pub log_file: String,
}

impl Settings {
    pub fn exec_timeout(&self) -> Duration {
        Duration::from_secs(self.exec_timeout_secs)
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    exec_timeout_secs: Option<u64>,
    keep_body_file: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/reqplate/config.toml (if exists)
    ///
    /// Scalars set in the overlay override the defaults.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/reqplate/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/reqplate/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("reqplate: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.exec_timeout_secs.filter(|&v| v > 0) {
            self.settings.exec_timeout_secs = v;
        }
        if let Some(v) = s.keep_body_file {
            self.settings.keep_body_file = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = s.log_file {
            self.settings.log_file = v;
        }
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::default_config();
        assert_eq!(config.settings.exec_timeout_secs, 10);
        assert_eq!(config.settings.exec_timeout(), Duration::from_secs(10));
        assert!(!config.settings.keep_body_file);
        assert_eq!(config.settings.log_level, "warn");
        assert!(config.settings.log_file.ends_with("reqplate.log"));
    }

    #[test]
    fn overlay_overrides_scalars() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            exec_timeout_secs = 3
            keep_body_file = true
        "#,
        );
        assert_eq!(config.settings.exec_timeout_secs, 3);
        assert!(config.settings.keep_body_file);
        // Untouched settings keep their defaults
        assert_eq!(config.settings.log_level, "warn");
    }

    #[test]
    fn overlay_can_disable_log_file() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            log_file = ""
        "#,
        );
        assert!(config.settings.log_file.is_empty());
    }

    #[test]
    fn zero_timeout_is_ignored() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            exec_timeout_secs = 0
        "#,
        );
        assert_eq!(config.settings.exec_timeout_secs, 10);
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let mut config = Config::default_config();
        config.apply_overlay_str("");
        assert_eq!(config.settings.exec_timeout_secs, 10);
        assert!(!config.settings.keep_body_file);
    }
}
