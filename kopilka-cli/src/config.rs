use anyhow::{Context, Result};
use kopilka_core::DateLocale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_kopilka_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub reference: ReferenceSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmSection {
    /// Only "openai" (any OpenAI-compatible chat completions endpoint) is supported
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSection {
    /// Categories below this share of their direction's total are collapsed
    pub threshold: f64,
    pub date_locale: DateLocale,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            threshold: kopilka_finance::DEFAULT_THRESHOLD,
            date_locale: DateLocale::Ru,
        }
    }
}

/// Where the student guides live. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceSection {
    pub parks_path: PathBuf,
    pub canteens_path: PathBuf,
}

impl Default for ReferenceSection {
    fn default() -> Self {
        Self {
            parks_path: PathBuf::from("data/parks.csv"),
            canteens_path: PathBuf::from("data/canteens.csv"),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_kopilka_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
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
        assert_eq!(cfg.analysis.threshold, 0.05);
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.llm.model = "gpt-4o-mini".into();
        cfg.analysis.date_locale = DateLocale::Us;
        save_config_to(&p, &cfg).unwrap();
        assert_eq!(load_config_from(&p).unwrap(), cfg);
    }

    #[test]
    fn test_partial_file_keeps_other_sections() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[analysis]\nthreshold = 0.1\ndate_locale = \"iso\"\n").unwrap();
        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.analysis.threshold, 0.1);
        assert_eq!(cfg.analysis.date_locale, DateLocale::Iso);
        assert_eq!(cfg.llm, LlmSection::default());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[llm\nmodel = ").unwrap();
        assert!(load_config_from(&p).is_err());
    }
}
