//! TOML-based service configuration.
//!
//! Stores:
//! - HTTP listener settings and which service variant to run
//! - Random-forest hyperparameters
//! - Bootstrap training data and feedback log locations
//! - Mock-variant behavior (simulated retrain delay)
//!
//! Configuration is stored at `~/.config/atena-ml/config.toml`. Relative
//! paths inside it resolve against the same directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::model::ForestParams;
use crate::policy::PolicyKind;

/// Which flavor of the HTTP service to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceVariant {
    /// Trained predictor, energy/difficulty policy, flat request bodies.
    #[default]
    Full,
    /// Mock service: default-adjustment policy, nested `context` bodies,
    /// simulated retraining.
    Minimal,
}

impl ServiceVariant {
    /// The recommendation policy this variant serves.
    pub fn policy_kind(self) -> PolicyKind {
        match self {
            ServiceVariant::Full => PolicyKind::EnergyDifficulty,
            ServiceVariant::Minimal => PolicyKind::DefaultAdjustment,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceVariant::Full => "full",
            ServiceVariant::Minimal => "minimal",
        }
    }
}

impl std::str::FromStr for ServiceVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ServiceVariant::Full),
            "minimal" | "mock" => Ok(ServiceVariant::Minimal),
            other => Err(format!("unknown service variant: {other} (expected full or minimal)")),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub variant: ServiceVariant,
}

/// Data file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Historical session records used to pre-train at startup.
    #[serde(default = "default_bootstrap_file")]
    pub bootstrap_file: PathBuf,
    /// Append-only JSONL feedback log.
    #[serde(default = "default_feedback_log")]
    pub feedback_log: PathBuf,
    /// Whether the full variant appends feedback to the log instead of
    /// only logging it. The minimal variant always appends.
    #[serde(default)]
    pub persist_feedback: bool,
}

/// Mock-variant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_retrain_delay_ms")]
    pub retrain_delay_ms: u64,
}

/// Service configuration.
///
/// Serialized to/from TOML at `~/.config/atena-ml/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ForestParams,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5050
}
fn default_bootstrap_file() -> PathBuf {
    PathBuf::from("pomodoro_training_data.json")
}
fn default_feedback_log() -> PathBuf {
    PathBuf::from("feedback_log.jsonl")
}
fn default_retrain_delay_ms() -> u64 {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            variant: ServiceVariant::Full,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            bootstrap_file: default_bootstrap_file(),
            feedback_log: default_feedback_log(),
            persist_feedback: false,
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            retrain_delay_ms: default_retrain_delay_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            let number = serde_json::Number::from_f64(n).ok_or_else(|| {
                                invalid(format!("cannot parse '{value}' as number"))
                            })?;
                            serde_json::Value::Number(number)
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    // Unset optional values take whatever JSON the input spells.
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the defaults cannot
    /// be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by dot-separated key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated
            .model
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Every key/value pair, flattened to dot paths.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Absolute path of the bootstrap training file.
    pub fn bootstrap_path(&self) -> Result<PathBuf, ConfigError> {
        resolve_path(&self.data.bootstrap_file)
    }

    /// Absolute path of the feedback log.
    pub fn feedback_log_path(&self) -> Result<PathBuf, ConfigError> {
        resolve_path(&self.data.feedback_log)
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(data_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, 5050);
        assert_eq!(parsed.server.variant, ServiceVariant::Full);
        assert_eq!(parsed.model.n_estimators, 100);
        assert_eq!(parsed.model.max_features, None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: Config = toml::from_str("[server]\nvariant = \"minimal\"\n").unwrap();
        assert_eq!(parsed.server.variant, ServiceVariant::Minimal);
        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.model.max_depth, 10);
        assert_eq!(parsed.mock.retrain_delay_ms, 1000);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("server.port").as_deref(), Some("5050"));
        assert_eq!(cfg.get("server.variant").as_deref(), Some("full"));
        assert_eq!(cfg.get("model.seed").as_deref(), Some("42"));
        assert!(cfg.get("server.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("server.port", "8080").unwrap();
        cfg.apply("server.variant", "minimal").unwrap();
        cfg.apply("data.persist_feedback", "true").unwrap();
        cfg.apply("model.max_features", "3").unwrap();

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.variant, ServiceVariant::Minimal);
        assert!(cfg.data.persist_feedback);
        assert_eq!(cfg.model.max_features, Some(3));
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("server.nonexistent_key", "value").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("data.persist_feedback", "not_a_bool").is_err());
        assert!(cfg.apply("server.variant", "enormous").is_err());
    }

    #[test]
    fn apply_rejects_invalid_forest_params() {
        let mut cfg = Config::default();
        assert!(cfg.apply("model.n_estimators", "0").is_err());
        assert_eq!(cfg.model.n_estimators, 100);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.server.port, 5050);
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.apply("server.port", "6060").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().server.port, 6060);
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = [not toml").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn entries_flatten_every_section() {
        let entries = Config::default().entries();
        assert!(entries.iter().any(|(k, v)| k == "server.port" && v == "5050"));
        assert!(entries
            .iter()
            .any(|(k, v)| k == "data.feedback_log" && v == "feedback_log.jsonl"));
    }

    #[test]
    fn variant_selects_policy() {
        assert_eq!(
            ServiceVariant::Full.policy_kind(),
            PolicyKind::EnergyDifficulty
        );
        assert_eq!(
            ServiceVariant::Minimal.policy_kind(),
            PolicyKind::DefaultAdjustment
        );
        assert_eq!("mock".parse::<ServiceVariant>(), Ok(ServiceVariant::Minimal));
    }
}
