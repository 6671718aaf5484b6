use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ledger::{LedgerRules, OverspendPolicy, Thresholds};

pub(crate) const CONFIG_ENV: &str = "HAPPYPOCKET_CONFIG";

/// User settings read from `config.json`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) overspend: OverspendPolicy,
    pub(crate) low_balance_percent: u32,
    pub(crate) usage_alert_percent: u32,
    pub(crate) currency_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) db_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            overspend: OverspendPolicy::default(),
            low_balance_percent: thresholds.low_balance_percent,
            usage_alert_percent: thresholds.usage_alert_percent,
            currency_symbol: "₹".into(),
            db_path: None,
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("low_balance_percent", self.low_balance_percent),
            ("usage_alert_percent", self.usage_alert_percent),
        ] {
            if value > 100 {
                bail!("{name} must be between 0 and 100, got {value}");
            }
        }
        Ok(())
    }

    pub(crate) fn rules(&self) -> LedgerRules {
        LedgerRules {
            overspend: self.overspend,
            thresholds: Thresholds {
                low_balance_percent: self.low_balance_percent,
                usage_alert_percent: self.usage_alert_percent,
            },
        }
    }
}

/// Where the config file lives: `$HAPPYPOCKET_CONFIG` or the platform
/// config directory.
pub(crate) fn config_path(dirs: &directories::ProjectDirs) -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => dirs.config_dir().join("config.json"),
    }
}

#[cfg(test)]
mod tests;
