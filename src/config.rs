// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "VISAUGMENT_CONFIG";
pub const ENABLED_ENV: &str = "VISAUGMENT_ENABLED";
pub const MAX_LAYERS_ENV: &str = "VISAUGMENT_MAX_LAYERS";
pub const AXIS_CHECK_ENV: &str = "VISAUGMENT_AXIS_CHECK";

/// What to do when the x-axis column is not sorted ascending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisCheck {
    /// Bin without looking at the order.
    Off,
    /// Log a warning and bin anyway.
    #[default]
    Warn,
    /// Refuse to bin an unsorted table.
    Strict,
}

impl AxisCheck {
    pub fn as_str(&self) -> &str {
        match self {
            AxisCheck::Off => "off",
            AxisCheck::Warn => "warn",
            AxisCheck::Strict => "strict",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" => Some(AxisCheck::Off),
            "warn" => Some(AxisCheck::Warn),
            "strict" => Some(AxisCheck::Strict),
            _ => None,
        }
    }
}

/// Settings for table augmentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Master switch; when off, any non-empty augment fields are rejected.
    pub enabled: bool,
    /// Maximum number of annotation layers accepted for one table.
    pub max_layers: usize,
    pub axis_check: AxisCheck,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_layers: 10,
            axis_check: AxisCheck::Warn,
        }
    }
}

impl AugmentConfig {
    /// Read a YAML config file. Missing keys take their default.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Defaults, then `$VISAUGMENT_CONFIG` (if set), then individual env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                info!(path = %path, "loading config");
                Self::from_yaml_file(path.trim())?
            }
            _ => Self::default(),
        };
        cfg.apply_overrides(|key| env::var(key).ok())?;
        debug!(?cfg, "effective config");
        Ok(cfg)
    }

    /// Apply `VISAUGMENT_*` overrides using `lookup` to fetch each key.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENABLED_ENV) {
            self.enabled = parse_bool(&v)
                .ok_or_else(|| anyhow!("{} must be true/false, got {:?}", ENABLED_ENV, v))?;
        }
        if let Some(v) = lookup(MAX_LAYERS_ENV) {
            self.max_layers = v
                .trim()
                .parse()
                .with_context(|| format!("{} must be an integer, got {:?}", MAX_LAYERS_ENV, v))?;
        }
        if let Some(v) = lookup(AXIS_CHECK_ENV) {
            self.axis_check = AxisCheck::from_str(&v).ok_or_else(|| {
                anyhow!("{} must be off, warn or strict, got {:?}", AXIS_CHECK_ENV, v)
            })?;
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, io::Write};
    use tempfile::NamedTempFile;

    #[test]
    fn yaml_partial_keeps_defaults() -> Result<()> {
        let cfg = AugmentConfig::from_yaml_str("axis_check: strict\n")?;
        assert_eq!(cfg.axis_check, AxisCheck::Strict);
        assert!(cfg.enabled);
        assert_eq!(cfg.max_layers, 10);

        assert_eq!(AugmentConfig::from_yaml_str("")?, AugmentConfig::default());
        Ok(())
    }

    #[test]
    fn yaml_file_roundtrip() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "enabled: false\nmax_layers: 3\naxis_check: off")?;
        let cfg = AugmentConfig::from_yaml_file(tmp.path())?;
        assert_eq!(
            cfg,
            AugmentConfig {
                enabled: false,
                max_layers: 3,
                axis_check: AxisCheck::Off,
            }
        );
        Ok(())
    }

    #[test]
    fn yaml_rejects_unknown_axis_check() {
        assert!(AugmentConfig::from_yaml_str("axis_check: sometimes").is_err());
    }

    #[test]
    fn env_overrides_apply() -> Result<()> {
        let vars: HashMap<&str, &str> = [
            (ENABLED_ENV, "no"),
            (MAX_LAYERS_ENV, " 2 "),
            (AXIS_CHECK_ENV, "STRICT"),
        ]
        .into_iter()
        .collect();

        let mut cfg = AugmentConfig::default();
        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string()))?;
        assert!(!cfg.enabled);
        assert_eq!(cfg.max_layers, 2);
        assert_eq!(cfg.axis_check, AxisCheck::Strict);
        Ok(())
    }

    #[test]
    fn bad_env_override_is_an_error() {
        let mut cfg = AugmentConfig::default();
        let err = cfg
            .apply_overrides(|k| (k == MAX_LAYERS_ENV).then(|| "many".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(MAX_LAYERS_ENV));
    }

    #[test]
    fn axis_check_names_roundtrip() {
        for check in [AxisCheck::Off, AxisCheck::Warn, AxisCheck::Strict] {
            assert_eq!(AxisCheck::from_str(check.as_str()), Some(check));
        }
        assert_eq!(AxisCheck::from_str("loud"), None);
    }
}
