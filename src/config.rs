use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::ProjectionParams;
use crate::error::Result;

/// Engine configuration loaded from a TOML file and `MIRA_*` environment variables.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub projection: ProjectionParams,
    /// Log a warning for every item missing from the factor table.
    pub warn_unknown_items: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionParams::default(),
            warn_unknown_items: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration with fallbacks:
    /// 1) the TOML file at `path` when given, else built-in defaults
    /// 2) `MIRA_*` environment overrides on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading engine config");
                Self::from_toml_str(&std::fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Apply overrides from a key lookup. Unparseable values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(year) = parsed(&lookup, "MIRA_START_YEAR") {
            self.projection.start_year = year;
        }
        if let Some(years) = parsed(&lookup, "MIRA_PROJECTION_YEARS") {
            self.projection.years = years;
        }
        if let Some(rate) = parsed(&lookup, "MIRA_GROWTH_RATE") {
            self.projection.growth_rate = rate;
        }
        if let Some(factor) = parsed(&lookup, "MIRA_REDUCTION_FACTOR") {
            self.projection.reduction_factor = factor;
        }
        if let Some(v) = lookup("MIRA_WARN_UNKNOWN_ITEMS") {
            if v == "0" || v.eq_ignore_ascii_case("false") {
                self.warn_unknown_items = false;
            } else if v == "1" || v.eq_ignore_ascii_case("true") {
                self.warn_unknown_items = true;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.projection.validate()
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable config override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.projection.years, 10);
        assert_eq!(config.projection.start_year, 2024);
        assert!((config.projection.growth_rate - 0.05).abs() < f64::EPSILON);
        assert!((config.projection.reduction_factor - 0.8).abs() < f64::EPSILON);
        assert!(config.warn_unknown_items);
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str("[projection]\nstart_year = 2030\n").unwrap();
        assert_eq!(config.projection.start_year, 2030);
        assert_eq!(config.projection.years, 10);
        assert!(config.warn_unknown_items);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EngineConfig::default();
        config.apply_overrides(lookup_from(&[
            ("MIRA_START_YEAR", "2026"),
            ("MIRA_GROWTH_RATE", "0.03"),
            ("MIRA_PROJECTION_YEARS", "not-a-number"),
            ("MIRA_WARN_UNKNOWN_ITEMS", "false"),
        ]));
        assert_eq!(config.projection.start_year, 2026);
        assert!((config.projection.growth_rate - 0.03).abs() < f64::EPSILON);
        assert_eq!(config.projection.years, 10);
        assert!(!config.warn_unknown_items);
    }

    #[test]
    fn test_validation_rejects_bad_reduction() {
        let config =
            EngineConfig::from_toml_str("[projection]\nreduction_factor = 1.5\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_misspelled_keys_rejected() {
        let err = EngineConfig::from_toml_str("[projection]\nstart_yaer = 2030\n").unwrap_err();
        assert!(matches!(err, crate::error::GhgError::Parse(_)));
        assert!(EngineConfig::from_toml_str("warn_unknown_itemz = false\n").is_err());
    }

    #[test]
    fn test_env_overrides_validated() {
        let mut config = EngineConfig::default();
        config.apply_overrides(lookup_from(&[("MIRA_START_YEAR", "2147483647")]));
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.apply_overrides(lookup_from(&[("MIRA_PROJECTION_YEARS", "1000000000")]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_toml_shape_is_parse_error() {
        assert!(EngineConfig::from_toml_str("projection = 3").is_err());
    }
}
