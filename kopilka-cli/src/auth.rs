use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::state::ensure_kopilka_home;

/// Environment variable that overrides the stored key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub openai_api_key: Option<String>,
}

fn auth_path() -> Result<PathBuf> {
    Ok(ensure_kopilka_home()?.join("auth.json"))
}

pub fn load_auth() -> Result<AuthState> {
    load_auth_from(&auth_path()?)
}

fn load_auth_from(p: &Path) -> Result<AuthState> {
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_auth(auth: &AuthState) -> Result<()> {
    let p = auth_path()?;
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// `OPENAI_API_KEY` if set and non-empty, else the stored key
pub fn resolve_api_key() -> Result<Option<String>> {
    resolve_api_key_from(std::env::var(API_KEY_ENV).ok(), &auth_path()?)
}

pub(crate) fn resolve_api_key_from(env_key: Option<String>, auth_file: &Path) -> Result<Option<String>> {
    if let Some(key) = env_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        return Ok(Some(key));
    }
    Ok(load_auth_from(auth_file)?
        .openai_api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty()))
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn openai_paste_api_key() -> Result<()> {
    let mut auth = load_auth()?;
    let key = prompt_secret("Paste OpenAI API key (starts with sk-)")?;
    if !key.starts_with("sk-") {
        bail!("key didn't look like an OpenAI API key (expected prefix sk-)");
    }
    auth.openai_api_key = Some(key);
    save_auth(&auth)?;
    println!("Saved OpenAI API key to {}", auth_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("auth.json");
        fs::write(&p, r#"{"openai_api_key": "sk-stored"}"#).unwrap();
        assert_eq!(resolve_api_key_from(Some(" sk-env ".into()), &p).unwrap(), Some("sk-env".into()));
        assert_eq!(resolve_api_key_from(Some("  ".into()), &p).unwrap(), Some("sk-stored".into()));
    }

    #[test]
    fn test_no_file_no_key() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_api_key_from(None, &dir.path().join("auth.json")).unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("auth.json");
        fs::write(&p, "{not json").unwrap();
        let err = resolve_api_key_from(None, &p).unwrap_err();
        assert!(err.to_string().contains("auth.json"));
    }
}
