use std::{path::PathBuf, time::Duration};

use log::LevelFilter;

use super::err::CustomError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection details of the Gemini service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    /// `None` when no key is configured; the AI features then fall back.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub gemini: GeminiSettings,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    pub admin_username: String,
    pub admin_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini: GeminiSettings::default(),
            log_level: LevelFilter::Info,
            log_file: None,
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
        }
    }
}

/// Loads `.env` into the process environment.
///
/// Returns the error of a `.env` file that exists but could not be loaded;
/// a missing file is not an error.
pub fn load_env_file() -> Option<dotenv::Error> {
    unreadable_env_file(dotenv::dotenv())
}

fn unreadable_env_file<T>(result: dotenv::Result<T>) -> Option<dotenv::Error> {
    match result {
        Ok(_) => None,
        Err(err) if err.not_found() => None,
        Err(err) => Some(err),
    }
}

impl Settings {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, CustomError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CustomError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Settings::default();

        let api_key = get("API_KEY")
            .or_else(|| get("GEMINI_API_KEY"))
            .filter(|key| key != "undefined");

        let timeout = match get("GEMINI_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    CustomError::Config(format!("GEMINI_TIMEOUT_SECS bukan angka: {raw}"))
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.gemini.timeout,
        };

        let log_level = match get("SIARSIP_LOG") {
            Some(raw) => raw
                .trim()
                .parse::<LevelFilter>()
                .map_err(|_| CustomError::Config(format!("SIARSIP_LOG tidak dikenal: {raw}")))?,
            None => defaults.log_level,
        };

        Ok(Self {
            gemini: GeminiSettings {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
                base_url: get("GEMINI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.gemini.base_url),
                timeout,
            },
            log_level,
            log_file: get("SIARSIP_LOG_FILE").map(PathBuf::from),
            admin_username: get("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: get("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        })
    }
}
