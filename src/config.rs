use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::consts::{APP_DIR, CONFIG_FILE_NAME, DEFAULT_TIMEOUT_SECS};
use crate::error::ConfigError;

const KNOWN_KEYS: [&str; 5] = ["username", "password", "eai_sess", "timeout", "proxy"];

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) password: String,
    #[serde(default, rename = "eai_sess")]
    pub(crate) session_token: String,
    /// Seconds
    #[serde(default = "default_timeout")]
    pub(crate) timeout: u64,
    #[serde(default)]
    pub(crate) proxy: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            session_token: String::new(),
            timeout: DEFAULT_TIMEOUT_SECS,
            proxy: None,
        }
    }
}

/// What gets written back to disk; the timeout stays out of the file.
#[derive(Serialize)]
struct PersistedConfig<'a> {
    username: &'a str,
    password: &'a str,
    eai_sess: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy: Option<&'a str>,
}

#[derive(Serialize)]
struct ConfigTemplate {
    username: &'static str,
    password: &'static str,
}

/// Result of opening a config file that may not exist yet
#[derive(Debug)]
pub(crate) enum ConfigFile {
    Loaded(Config),
    /// A blank template was written; the user has to fill it in first.
    Created,
}

impl Config {
    pub(crate) fn default_path() -> Option<PathBuf> {
        let dir = dirs::config_dir()?;
        Some(dir.join(APP_DIR).join(CONFIG_FILE_NAME))
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub(crate) fn load_or_create(path: &Path) -> Result<ConfigFile, ConfigError> {
        if !path.exists() {
            Self::write_template(path)?;
            return Ok(ConfigFile::Created);
        }
        Self::load(path).map(ConfigFile::Loaded)
    }

    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(content).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        let Value::Object(map) = value else {
            return Err(ConfigError::NotAnObject {
                path: path.to_path_buf(),
            });
        };

        let known: Map<String, Value> = map
            .into_iter()
            .filter(|(key, _)| {
                let ok = KNOWN_KEYS.contains(&key.as_str());
                if !ok {
                    warn!("Invalid config key: {key}");
                }
                ok
            })
            .collect();

        let config: Config =
            serde_json::from_value(Value::Object(known)).map_err(|source| {
                ConfigError::InvalidValue {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let persisted = PersistedConfig {
            username: &self.username,
            password: &self.password,
            eai_sess: &self.session_token,
            proxy: self.proxy.as_deref(),
        };
        let json = serde_json::to_string_pretty(&persisted).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Finished writing config file");
        Ok(())
    }

    fn write_template(path: &Path) -> Result<(), ConfigError> {
        let template = ConfigTemplate {
            username: "",
            password: "",
        };
        let json = serde_json::to_string_pretty(&template).map_err(ConfigError::Serialize)?;
        let create_err = |source| ConfigError::Create {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(create_err)?;
        }
        fs::write(path, json).map_err(create_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Config, ConfigError> {
        Config::parse(content, Path::new("test.json"))
    }

    #[test]
    fn parse_full_config() {
        let config = parse(
            r#"{"username":"s2020","password":"pw","eai_sess":"abc","timeout":10,"proxy":"http://127.0.0.1:8888"}"#,
        )
        .unwrap();
        assert_eq!(config.username, "s2020");
        assert_eq!(config.password, "pw");
        assert_eq!(config.session_token, "abc");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:8888"));
    }

    #[test]
    fn parse_applies_defaults() {
        let config = parse(r#"{"username":"","password":""}"#).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn parse_ignores_unknown_keys() {
        let config = parse(r#"{"username":"u","password":"p","color":"blue"}"#).unwrap();
        assert_eq!(config.username, "u");
        assert_eq!(config.password, "p");
    }

    #[test]
    fn parse_accepts_null_proxy() {
        let config = parse(r#"{"username":"u","password":"p","proxy":null}"#).unwrap();
        assert!(config.proxy.is_none());
    }

    #[test]
    fn parse_rejects_non_object() {
        let err = parse("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { .. }));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let err = parse("{username:").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn parse_rejects_wrong_type() {
        let err = parse(r#"{"username":"u","timeout":"soon"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn parse_rejects_zero_timeout() {
        let err = parse(r#"{"timeout":0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));
    }

    #[test]
    fn load_or_create_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let outcome = Config::load_or_create(&path).unwrap();
        assert!(matches!(outcome, ConfigFile::Created));

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"username": "", "password": ""}));

        let outcome = Config::load_or_create(&path).unwrap();
        assert!(matches!(outcome, ConfigFile::Loaded(c) if c == Config::default()));
    }

    #[test]
    fn save_omits_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            username: "u".to_string(),
            password: "p".to_string(),
            session_token: "token".to_string(),
            timeout: 30,
            proxy: None,
        };

        config.save(&path).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({"username": "u", "password": "p", "eai_sess": "token"})
        );
        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.session_token, "token");
        assert_eq!(reloaded.timeout, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn save_keeps_proxy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            proxy: Some("http://proxy:3128".to_string()),
            ..Config::default()
        };

        config.save(&path).unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.proxy.as_deref(), Some("http://proxy:3128"));
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with(Path::new(APP_DIR).join(CONFIG_FILE_NAME)));
        }
    }
}
