use anyhow::{Context, Result};
use kopilka_core::{City, Country, SocialStatus};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `KOPILKA_HOME` when set, otherwise `~/.kopilka`
pub fn kopilka_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("KOPILKA_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".kopilka"))
}

pub fn ensure_kopilka_home() -> Result<PathBuf> {
    let dir = kopilka_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Answers from `kopilka setup`; used as defaults for `analyze`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub created_at_utc: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_status")]
    pub status: SocialStatus,
    #[serde(default = "default_country")]
    pub country: Country,
    #[serde(default = "default_city")]
    pub city: City,
}

fn default_status() -> SocialStatus {
    SocialStatus::Student
}

fn default_country() -> Country {
    Country::Kazakhstan
}

fn default_city() -> City {
    City::Astana
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            created_at_utc: None,
            name: String::new(),
            status: default_status(),
            country: default_country(),
            city: default_city(),
        }
    }
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_kopilka_home()?.join("profile.json"))
}

pub fn write_profile(profile: &Profile) -> Result<()> {
    write_profile_to(&profile_path()?, profile)
}

pub fn read_profile() -> Result<Profile> {
    read_profile_from(&profile_path()?)
}

fn write_profile_to(p: &Path, profile: &Profile) -> Result<()> {
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

fn read_profile_from(p: &Path) -> Result<Profile> {
    if !p.exists() {
        return Ok(Profile::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_roundtrip_and_default() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("profile.json");
        assert_eq!(read_profile_from(&p).unwrap(), Profile::default());

        let profile = Profile {
            created_at_utc: Some("2024-05-01T00:00:00+00:00".into()),
            name: "Айгерим".into(),
            status: SocialStatus::Employed,
            country: Country::Russia,
            city: City::Moscow,
        };
        write_profile_to(&p, &profile).unwrap();
        assert_eq!(read_profile_from(&p).unwrap(), profile);
    }

    #[test]
    fn test_profile_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("profile.json");
        fs::write(&p, r#"{"created_at_utc": null, "city": "london"}"#).unwrap();
        let profile = read_profile_from(&p).unwrap();
        assert_eq!(profile.city, City::London);
        assert_eq!(profile.status, SocialStatus::Student);
    }
}
