//! Kavela site configuration
//!
//! Settings are loaded from `kavela.toml` and can be overridden by
//! environment variables. Every key is optional; missing keys take the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kavela.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct KavelaConfig {
    /// Simulated viewport
    pub viewport: ViewportConfig,
    /// Scroll-triggered reveal settings
    pub reveal: RevealSettings,
    /// In-page anchor navigation settings
    pub navigation: NavigationSettings,
    /// Intersection polling settings
    pub observer: ObserverSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevealSettings {
    /// CSS-style margin list applied to the viewport before intersection tests
    pub root_margin: String,
    /// Delay multiplier per item index, in milliseconds
    pub stagger_ms: u32,
    /// Minimum visible fraction of a group before it triggers
    pub threshold: f32,
    /// Duration of a single item's fade/slide
    pub duration_ms: f32,
    /// Initial downward offset of hidden items
    pub offset_px: f32,
    /// Easing name (`linear`, `ease`, `ease_in`, `ease_out`, `ease_in_out`)
    pub easing: String,
    /// Reveal groups that are already on screen at mount without staggering
    pub instant_above_fold: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationSettings {
    pub scroll_duration_ms: f32,
    /// Subtracted from the target's top edge (e.g. for a fixed header)
    pub scroll_offset: f32,
    pub easing: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObserverSettings {
    /// Minimum time between intersection recomputations while time advances
    pub poll_interval_ms: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter string
    pub filter: String,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            root_margin: "0px 0px -10% 0px".to_string(),
            stagger_ms: 110,
            threshold: 0.15,
            duration_ms: 600.0,
            offset_px: 24.0,
            easing: "ease_out".to_string(),
            instant_above_fold: false,
        }
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            scroll_duration_ms: 450.0,
            scroll_offset: 0.0,
            easing: "ease_in_out".to_string(),
        }
    }
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 16.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl KavelaConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or return defaults if the file does not exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load_from_file(path) {
            Err(ConfigError::Read(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::InvalidValue {
                key: "reveal.threshold",
                value: self.reveal.threshold.to_string(),
            });
        }
        if !is_root_margin(&self.reveal.root_margin) {
            return Err(ConfigError::InvalidValue {
                key: "reveal.root_margin",
                value: self.reveal.root_margin.clone(),
            });
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "viewport",
                value: format!("{}x{}", self.viewport.width, self.viewport.height),
            });
        }
        if self.reveal.duration_ms < 0.0 || self.navigation.scroll_duration_ms < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "duration_ms",
                value: format!(
                    "{} / {}",
                    self.reveal.duration_ms, self.navigation.scroll_duration_ms
                ),
            });
        }
        Ok(())
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// Unparsable values are ignored with a warning.
    pub fn merge_with_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("KAVELA_STAGGER_MS") {
            match val.trim().parse::<u32>() {
                Ok(ms) => self.reveal.stagger_ms = ms,
                Err(_) => warn!(value = %val, "ignoring invalid KAVELA_STAGGER_MS"),
            }
        }
        if let Some(val) = var("KAVELA_ROOT_MARGIN") {
            if is_root_margin(&val) {
                self.reveal.root_margin = val;
            } else {
                warn!(value = %val, "ignoring invalid KAVELA_ROOT_MARGIN");
            }
        }
        if let Some(val) = var("KAVELA_THRESHOLD") {
            match val.trim().parse::<f32>() {
                Ok(t) if (0.0..=1.0).contains(&t) => self.reveal.threshold = t,
                _ => warn!(value = %val, "ignoring invalid KAVELA_THRESHOLD"),
            }
        }
        if let Some(val) = var("KAVELA_VIEWPORT") {
            match parse_viewport(&val) {
                Some((width, height)) => {
                    self.viewport.width = width;
                    self.viewport.height = height;
                }
                None => warn!(value = %val, "ignoring invalid KAVELA_VIEWPORT"),
            }
        }
        if let Some(val) = var("KAVELA_SCROLL_DURATION_MS") {
            match val.trim().parse::<f32>() {
                Ok(ms) if ms >= 0.0 => self.navigation.scroll_duration_ms = ms,
                _ => warn!(value = %val, "ignoring invalid KAVELA_SCROLL_DURATION_MS"),
            }
        }
        if let Some(val) = var("KAVELA_LOG") {
            self.logging.filter = val;
        }
    }
}

/// Whether `value` is a 1 to 4 value margin list of `Npx`, `N%` or `0`.
fn is_root_margin(value: &str) -> bool {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    (1..=4).contains(&tokens.len())
        && tokens.iter().all(|token| {
            if let Some(n) = token.strip_suffix("px").or_else(|| token.strip_suffix('%')) {
                n.parse::<f32>().is_ok()
            } else {
                token.parse::<f32>().is_ok_and(|n| n == 0.0)
            }
        })
}

/// Parse `WIDTHxHEIGHT`.
fn parse_viewport(value: &str) -> Option<(f32, f32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let width: f32 = w.trim().parse().ok()?;
    let height: f32 = h.trim().parse().ok()?;
    (width > 0.0 && height > 0.0).then_some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = KavelaConfig::default();
        assert_eq!(config.reveal.stagger_ms, 110);
        assert_eq!(config.reveal.root_margin, "0px 0px -10% 0px");
        assert!(!config.reveal.instant_above_fold);
        assert_eq!(config.viewport.height, 800.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let config = KavelaConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: KavelaConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = KavelaConfig::from_toml("[reveal]\nstagger_ms = 80\n").unwrap();
        assert_eq!(config.reveal.stagger_ms, 80);
        assert_eq!(config.reveal.threshold, 0.15);
        assert_eq!(config.navigation.scroll_duration_ms, 450.0);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = KavelaConfig::from_toml("[reveal]\nthreshold = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "reveal.threshold", .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[viewport]\nwidth = 390.0\nheight = 844.0").unwrap();
        let config = KavelaConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.viewport.width, 390.0);
    }

    #[test]
    fn test_load_or_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = KavelaConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, KavelaConfig::default());
    }

    #[test]
    fn test_load_or_default_surfaces_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reveal\nbroken").unwrap();
        let err = KavelaConfig::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_merge_with_vars() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("KAVELA_STAGGER_MS", "90"),
            ("KAVELA_VIEWPORT", "390x844"),
            ("KAVELA_THRESHOLD", "not-a-number"),
            ("KAVELA_LOG", "debug"),
        ]);
        let mut config = KavelaConfig::default();
        config.merge_with_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.reveal.stagger_ms, 90);
        assert_eq!(config.viewport.width, 390.0);
        assert_eq!(config.viewport.height, 844.0);
        assert_eq!(config.reveal.threshold, 0.15);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_invalid_root_margin_override_ignored() {
        let mut config = KavelaConfig::default();
        config.merge_with_vars(|key| (key == "KAVELA_ROOT_MARGIN").then(|| "10 px wide".to_string()));
        assert_eq!(config.reveal.root_margin, "0px 0px -10% 0px");

        config.merge_with_vars(|key| (key == "KAVELA_ROOT_MARGIN").then(|| "-20px 5%".to_string()));
        assert_eq!(config.reveal.root_margin, "-20px 5%");
    }

    #[test]
    fn test_invalid_root_margin_in_file_rejected() {
        let err = KavelaConfig::from_toml("[reveal]\nroot_margin = \"1px 2px 3px 4px 5px\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "reveal.root_margin", .. }));
        assert!(is_root_margin("0"));
        assert!(!is_root_margin("12"));
        assert!(!is_root_margin(""));
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let sample = include_str!("../../../kavela.toml");
        assert_eq!(KavelaConfig::from_toml(sample).unwrap(), KavelaConfig::default());
    }

    #[test]
    fn test_parse_viewport() {
        assert_eq!(parse_viewport("1280x800"), Some((1280.0, 800.0)));
        assert_eq!(parse_viewport(" 390 X 844 "), Some((390.0, 844.0)));
        assert_eq!(parse_viewport("0x10"), None);
        assert_eq!(parse_viewport("wide"), None);
    }
}
