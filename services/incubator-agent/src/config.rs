//! Configuration for the incubator agent.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use hatchery_reconcile::ChangeDetection;

use crate::allocator::{AllocationPolicy, DEFAULT_LEVEL_GATE, DEFAULT_LONG_RANGE_KM};
use crate::reconciler::ReconcilerConfig;
use crate::state::UsageStore;

/// Incubator agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Profile directory; the usage file lives under `temp/`.
    pub profile_dir: PathBuf,

    /// Inventory service base URL.
    pub inventory_url: String,

    /// Eggs shorter than this never go into limited incubators.
    pub min_incubator_km: f64,

    pub level_gate: u32,

    pub long_range_km: f64,

    /// Seconds between passes.
    pub run_interval_secs: u64,

    pub change_detection: ChangeDetection,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile_dir = lookup("HATCHERY_PROFILE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./profile"));

        let inventory_url = lookup("HATCHERY_INVENTORY_URL")
            .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());

        let min_incubator_km = parse_var(&lookup, "HATCHERY_MIN_INCUBATOR_KM", 2.0)?;
        let level_gate = parse_var(&lookup, "HATCHERY_LEVEL_GATE", DEFAULT_LEVEL_GATE)?;
        let long_range_km = parse_var(&lookup, "HATCHERY_LONG_RANGE_KM", DEFAULT_LONG_RANGE_KM)?;

        let run_interval_secs = parse_var(&lookup, "HATCHERY_RUN_INTERVAL_SECS", 60u64)?.max(1);

        let change_detection = match lookup("HATCHERY_CHANGE_DETECTION") {
            Some(raw) => ChangeDetection::parse(&raw).ok_or_else(|| {
                anyhow!("HATCHERY_CHANGE_DETECTION must be 'unordered' or 'ordered', got {raw:?}")
            })?,
            None => ChangeDetection::default(),
        };

        let log_level = lookup("HATCHERY_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            profile_dir,
            inventory_url,
            min_incubator_km,
            level_gate,
            long_range_km,
            run_interval_secs,
            change_detection,
            log_level,
        })
    }

    /// Usage store under the profile directory.
    pub fn usage_store(&self) -> UsageStore {
        UsageStore::in_profile(&self.profile_dir)
    }

    pub fn allocation_policy(&self) -> AllocationPolicy {
        AllocationPolicy {
            min_km: self.min_incubator_km,
            level_gate: self.level_gate,
            long_range_km: self.long_range_km,
        }
    }

    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            run_interval: Duration::from_secs(self.run_interval_secs),
            change_detection: self.change_detection,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.profile_dir, PathBuf::from("./profile"));
        assert_eq!(config.inventory_url, "http://127.0.0.1:8080");
        assert_eq!(config.min_incubator_km, 2.0);
        assert_eq!(config.level_gate, 20);
        assert_eq!(config.long_range_km, 10.0);
        assert_eq!(config.run_interval_secs, 60);
        assert_eq!(config.change_detection, ChangeDetection::Unordered);
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.usage_store().path(),
            PathBuf::from("./profile/temp/incubators.json")
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HATCHERY_PROFILE_DIR", "/data/alice"),
            ("HATCHERY_MIN_INCUBATOR_KM", "5"),
            ("HATCHERY_LEVEL_GATE", "25"),
            ("HATCHERY_RUN_INTERVAL_SECS", "0"),
            ("HATCHERY_CHANGE_DETECTION", "ordered"),
        ])
        .unwrap();

        assert_eq!(config.min_incubator_km, 5.0);
        assert_eq!(config.run_interval_secs, 1);
        assert_eq!(config.change_detection, ChangeDetection::Ordered);

        let policy = config.allocation_policy();
        assert_eq!(policy.level_gate, 25);
        assert_eq!(policy.min_km, 5.0);
        assert_eq!(
            config.reconciler_config().run_interval,
            Duration::from_secs(1)
        );
        assert_eq!(
            config.usage_store().path(),
            PathBuf::from("/data/alice/temp/incubators.json")
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = load(&[("HATCHERY_MIN_INCUBATOR_KM", "two")]).unwrap_err();
        assert!(err.to_string().contains("HATCHERY_MIN_INCUBATOR_KM"));
    }

    #[test]
    fn test_invalid_change_detection() {
        assert!(load(&[("HATCHERY_CHANGE_DETECTION", "sorted")]).is_err());
    }
}
