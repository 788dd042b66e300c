//! Configuration loading and parsing.
//!
//! Parses `oxspell.toml` (or an override path provided by the binary). Two
//! tables are recognised: `[speller]` (language, dictionaries, word filters)
//! and `[auto_disable]` (the error-density policy of automatic mode). Every
//! field has a default so a missing file, a missing table or an unknown key is
//! never an error. A file that fails to parse falls back to defaults with a
//! warning under the `config` target.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Language used when neither the file nor the environment names one.
pub const FALLBACK_LANGUAGE: &str = "en_US";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SpellerConfig {
    #[serde(default = "SpellerConfig::default_language")]
    pub default_language: String,
    #[serde(default)]
    pub preferred_languages: Vec<String>,
    #[serde(default)]
    pub skip_uppercase: bool,
    #[serde(default = "SpellerConfig::default_true")]
    pub skip_run_together: bool,
    #[serde(default = "SpellerConfig::default_true")]
    pub autodetect_language: bool,
    #[serde(default)]
    pub checker_enabled_by_default: bool,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub dictionary_dir: Option<PathBuf>,
    #[serde(default)]
    pub personal_dictionary: Option<PathBuf>,
}

impl Default for SpellerConfig {
    fn default() -> Self {
        Self {
            default_language: Self::default_language(),
            preferred_languages: Vec::new(),
            skip_uppercase: false,
            skip_run_together: true,
            autodetect_language: true,
            checker_enabled_by_default: false,
            ignore: Vec::new(),
            dictionary_dir: None,
            personal_dictionary: None,
        }
    }
}

impl SpellerConfig {
    const fn default_true() -> bool {
        true
    }

    /// `$LANG` without its encoding suffix (`de_DE.UTF-8` -> `de_DE`).
    fn default_language() -> String {
        std::env::var("LANG")
            .ok()
            .and_then(|lang| language_from_locale(&lang))
            .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
    }
}

fn language_from_locale(locale: &str) -> Option<String> {
    let code = locale.split(['.', '@']).next().unwrap_or_default();
    if code.is_empty() || code == "C" || code == "POSIX" {
        None
    } else {
        Some(code.to_string())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AutoDisableConfig {
    #[serde(default)]
    pub automatic: bool,
    #[serde(default = "AutoDisableConfig::default_min_words")]
    pub min_words: u32,
    #[serde(default = "AutoDisableConfig::default_max_error_ratio")]
    pub max_error_ratio: f64,
}

impl Default for AutoDisableConfig {
    fn default() -> Self {
        Self {
            automatic: false,
            min_words: Self::default_min_words(),
            max_error_ratio: Self::default_max_error_ratio(),
        }
    }
}

impl AutoDisableConfig {
    const fn default_min_words() -> u32 {
        10
    }
    const fn default_max_error_ratio() -> f64 {
        0.4
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub speller: SpellerConfig,
    #[serde(default)]
    pub auto_disable: AutoDisableConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("oxspell.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxspell").join("oxspell.toml");
    }
    PathBuf::from("oxspell.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                language = file.speller.default_language.as_str(),
                automatic = file.auto_disable.automatic,
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_error");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Ratio clamped into `(0, 1]`; out-of-range values fall back to the default.
    pub fn effective_error_ratio(&self) -> f64 {
        let ratio = self.file.auto_disable.max_error_ratio;
        if ratio > 0.0 && ratio <= 1.0 {
            ratio
        } else {
            warn!(target: "config", ratio, "max_error_ratio_out_of_range");
            AutoDisableConfig::default_max_error_ratio()
        }
    }
}
