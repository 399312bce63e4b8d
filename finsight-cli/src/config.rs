use anyhow::{Context, Result};
use finsight_core::{ReportOptions, SessionSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::state::ensure_finsight_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSection,
    pub analysis: AnalysisSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Ledger CSVs; with neither set the CLI falls back to fixture data
    pub expenses_csv: Option<PathBuf>,
    pub income_csv: Option<PathBuf>,
    /// Length of the generated fixture ledger, ending today
    pub fixture_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Divisor for monthly averages. Derived from the data's month span when unset; 0 is rejected.
    pub periods_observed: Option<NonZeroU32>,
    /// IANA zone used to decide what "today" is
    pub timezone: String,
    pub top_merchants: usize,
    pub recent_transactions: usize,
    pub dashboard_days: u64,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            expenses_csv: None,
            income_csv: None,
            fixture_days: 90,
        }
    }
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            periods_observed: None,
            timezone: "America/Chicago".to_string(),
            top_merchants: 5,
            recent_transactions: 10,
            dashboard_days: 90,
        }
    }
}

impl AnalysisSection {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            periods_observed: self.periods_observed,
            report: ReportOptions {
                top_merchants: self.top_merchants,
                recent_transactions: self.recent_transactions,
            },
            dashboard_days: self.dashboard_days,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_finsight_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Missing file means defaults
pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.analysis.timezone, "America/Chicago");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[analysis]\nperiods_observed = 3\ntop_merchants = 8\n").unwrap();
        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.analysis.periods_observed, NonZeroU32::new(3));
        assert_eq!(cfg.analysis.top_merchants, 8);
        assert_eq!(cfg.analysis.recent_transactions, 10);
        assert_eq!(cfg.data.fixture_days, 90);

        let settings = cfg.analysis.session_settings();
        assert_eq!(settings.report.top_merchants, 8);
        assert_eq!(settings.periods_observed, NonZeroU32::new(3));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.data.expenses_csv = Some(PathBuf::from("/data/expenses.csv"));
        save_config_to(&cfg, &p).unwrap();
        assert_eq!(load_config_from(&p).unwrap(), cfg);
    }

    #[test]
    fn test_zero_periods_observed_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[analysis]\nperiods_observed = 0\n").unwrap();
        let err = load_config_from(&p).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.starts_with("parse") && msg.contains("zero"), "{msg}");
    }

    #[test]
    fn test_bad_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[analysis\n").unwrap();
        let err = load_config_from(&p).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
