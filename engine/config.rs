use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_YIELD_INTERVAL: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Tablets processed by a populate scan between two yields to the runtime.
    pub yield_interval: usize,
    /// Log every replica dropped for an out-of-range shard index.
    pub log_skipped_replicas: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            yield_interval: DEFAULT_YIELD_INTERVAL,
            log_skipped_replicas: true,
        }
    }
}

impl SketchConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var("MINSQL_SKETCH_YIELD_INTERVAL") {
            config.yield_interval = value
                .parse()
                .context("Invalid MINSQL_SKETCH_YIELD_INTERVAL")?;
        }

        if let Ok(value) = env::var("MINSQL_SKETCH_LOG_SKIPPED") {
            config.log_skipped_replicas = value
                .parse()
                .context("Invalid MINSQL_SKETCH_LOG_SKIPPED")?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid sketch config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.yield_interval == 0 {
            anyhow::bail!("yield_interval must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SketchConfig::default();
        assert_eq!(config.yield_interval, DEFAULT_YIELD_INTERVAL);
        assert!(config.log_skipped_replicas);
    }

    #[test]
    fn test_from_json_partial() {
        let config = SketchConfig::from_json(r#"{"yield_interval": 16}"#).unwrap();
        assert_eq!(config.yield_interval, 16);
        assert!(config.log_skipped_replicas);
    }

    // Env vars are process-wide, so every from_env case lives in one test.
    #[test]
    fn test_from_env() {
        env::remove_var("MINSQL_SKETCH_YIELD_INTERVAL");
        env::remove_var("MINSQL_SKETCH_LOG_SKIPPED");
        assert_eq!(SketchConfig::from_env().unwrap(), SketchConfig::default());

        env::set_var("MINSQL_SKETCH_YIELD_INTERVAL", "32");
        env::set_var("MINSQL_SKETCH_LOG_SKIPPED", "false");
        let config = SketchConfig::from_env().unwrap();
        assert_eq!(config.yield_interval, 32);
        assert!(!config.log_skipped_replicas);

        env::set_var("MINSQL_SKETCH_YIELD_INTERVAL", "abc");
        let err = SketchConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("MINSQL_SKETCH_YIELD_INTERVAL"));

        env::set_var("MINSQL_SKETCH_YIELD_INTERVAL", "0");
        assert!(SketchConfig::from_env().is_err());

        env::remove_var("MINSQL_SKETCH_YIELD_INTERVAL");
        env::remove_var("MINSQL_SKETCH_LOG_SKIPPED");
    }

    #[test]
    fn test_from_json_rejects_zero_interval() {
        assert!(SketchConfig::from_json(r#"{"yield_interval": 0}"#).is_err());
        assert!(SketchConfig::from_json("not json").is_err());
    }
}
