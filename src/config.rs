// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_BACKUP_INTERVAL_DAYS: u32 = 7;

/// When a budget-reached alert is raised for an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetAlertPolicy {
    /// Every expense that leaves the category at or above its budget alerts again.
    #[default]
    EveryAddition,
    /// Only the expense that moves spending from below the budget to at/above it alerts.
    OnCrossing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub budget_alerts: BudgetAlertPolicy,
    /// Operator-controlled code that unlocks regardless of the saved PIN. Off unless set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_pin: Option<String>,
    pub backup_interval_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budget_alerts: BudgetAlertPolicy::default(),
            recovery_pin: None,
            backup_interval_days: DEFAULT_BACKUP_INTERVAL_DAYS,
            backup_dir: None,
        }
    }
}

impl Config {
    /// Reads `config.json` from `dir`; a missing file yields defaults.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&path)?;
        let cfg: Config = serde_json::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(CONFIG_FILE), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Recovery PIN, ignoring blank values.
    pub fn recovery_pin(&self) -> Option<&str> {
        self.recovery_pin
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
