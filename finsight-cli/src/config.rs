use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::session::ensure_finsight_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub extract: ExtractSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractSection {
    pub model: String,
    pub max_retries: u32,
    /// Optional stored key. `--api-key` and GEMINI_API_KEY take precedence.
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extract: ExtractSection {
                model: finsight_extract::DEFAULT_MODEL.to_string(),
                max_retries: 3,
                api_key: None,
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_finsight_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    let s = toml::to_string_pretty(&cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    println!("Wrote {}", p.display());
    Ok(())
}

/// Resolve the extraction credential: flag, then environment, then config.
/// The key is handed to the client explicitly; nothing reads it ambiently.
pub fn resolve_api_key(flag: Option<String>, cfg: &Config) -> Result<String> {
    if let Some(key) = flag {
        return Ok(key.trim().to_string());
    }
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
    }
    if let Some(key) = &cfg.extract.api_key {
        return Ok(key.trim().to_string());
    }
    bail!("no extraction API key; pass --api-key, set GEMINI_API_KEY, or add api_key to config.toml")
}
