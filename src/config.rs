//! Configuration for the Telegram connection and notifier texts
//!
//! Loads configuration from config.yml file

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default constants (fallback if config.yml not found)
pub const SESSION_NAME: &str = "notifier_session";
pub const DEFAULT_INIT_GRACE_SECS: u64 = 5;
pub const DEFAULT_TEST_MESSAGE: &str = "测试消息";
pub const DEFAULT_TEST_SUCCESS_TEXT: &str = "测试消息发送成功";
pub const DEFAULT_SEND_SUCCESS_TEXT: &str = "消息发送成功";

/// YAML config structures
#[derive(Debug, Default, Deserialize)]
struct YamlConfig {
    telegram: Option<TelegramConfig>,
    notifier: Option<NotifierConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct TelegramConfig {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    api_id: Option<String>,
    api_hash: Option<String>,
    phone: Option<String>,
    password: Option<String>,
    session_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NotifierConfig {
    init_grace_secs: Option<u64>,
    test_message: Option<String>,
    test_success_text: Option<String>,
    send_success_text: Option<String>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub api_id: i32,
    pub api_hash: String,
    pub phone: String,
    /// Two-factor password; prompted for interactively when empty.
    pub password: Option<String>,
    pub session_name: String,
    pub init_grace: Duration,
    pub test_message: String,
    pub test_success_text: String,
    pub send_success_text: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from config.yml or use defaults
    /// Environment variables take precedence over config.yml values
    pub fn new() -> Self {
        Self::load_from_file("config.yml")
            .or_else(|_| Self::load_from_file("../config.yml"))
            .unwrap_or_else(|_| Self::from_yaml(YamlConfig::default()))
    }

    /// Resolve a value: prefer env var if config value looks like ${VAR}
    fn resolve_env_string(value: Option<String>, env_key: &str) -> String {
        if let Some(ref v) = value {
            if let Some(var_name) = placeholder_name(v) {
                if let Ok(env_val) = std::env::var(var_name) {
                    return env_val;
                }
            }
        }
        if let Ok(env_val) = std::env::var(env_key) {
            return env_val;
        }
        match value {
            // An unresolved placeholder is as good as unset
            Some(v) if placeholder_name(&v).is_some() => String::new(),
            other => other.unwrap_or_default(),
        }
    }

    /// Resolve an integer value from string config or env var
    fn resolve_env_i32(value: Option<String>, env_key: &str) -> i32 {
        if let Some(ref v) = value {
            if let Some(var_name) = placeholder_name(v) {
                if let Some(parsed) = std::env::var(var_name).ok().and_then(|s| s.parse().ok()) {
                    return parsed;
                }
            }
        }
        if let Some(parsed) = std::env::var(env_key).ok().and_then(|s| s.parse().ok()) {
            return parsed;
        }
        value.and_then(|v| v.parse().ok()).unwrap_or(0)
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document parses as unit, not as a mapping
        if content.trim().is_empty() {
            return Ok(Self::from_yaml(YamlConfig::default()));
        }
        let yaml: YamlConfig = serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;
        Ok(Self::from_yaml(yaml))
    }

    fn from_yaml(yaml: YamlConfig) -> Self {
        let telegram = yaml.telegram.unwrap_or_default();
        let notifier = yaml.notifier.unwrap_or_default();

        let password = Self::resolve_env_string(telegram.password, "TELEGRAM_2FA_PASSWORD");

        Self {
            api_id: Self::resolve_env_i32(telegram.api_id, "TELEGRAM_API_ID"),
            api_hash: Self::resolve_env_string(telegram.api_hash, "TELEGRAM_API_HASH"),
            phone: Self::resolve_env_string(telegram.phone, "TELEGRAM_PHONE"),
            password: (!password.is_empty()).then_some(password),
            session_name: telegram
                .session_name
                .unwrap_or_else(|| SESSION_NAME.to_string()),
            init_grace: Duration::from_secs(
                notifier.init_grace_secs.unwrap_or(DEFAULT_INIT_GRACE_SECS),
            ),
            test_message: notifier
                .test_message
                .unwrap_or_else(|| DEFAULT_TEST_MESSAGE.to_string()),
            test_success_text: notifier
                .test_success_text
                .unwrap_or_else(|| DEFAULT_TEST_SUCCESS_TEXT.to_string()),
            send_success_text: notifier
                .send_success_text
                .unwrap_or_else(|| DEFAULT_SEND_SUCCESS_TEXT.to_string()),
        }
    }

    /// Path of the grammers session cache
    pub fn session_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.session", self.session_name))
    }

    /// Path of the lock file guarding the session cache
    pub fn lock_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.lock", self.session_name))
    }
}

/// Extract `VAR` from a `${VAR}` placeholder
fn placeholder_name(value: &str) -> Option<&str> {
    value.strip_prefix("${")?.strip_suffix('}')
}
