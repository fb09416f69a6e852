//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::LinterError;
use crate::diagnostic::Severity;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Config file names looked up in the working directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".marklint.jsonc", ".marklint.json"];

/// Default cap on fix passes per file.
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Default maximum file size (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration for the linter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Rule settings keyed by rule id or rule name.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOption>,

    /// File patterns to include.
    #[serde(default)]
    pub include: Vec<String>,

    /// File patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Apply fixes.
    #[serde(default)]
    pub fix: bool,

    /// Compute fixes without writing them.
    #[serde(default)]
    pub dry_run: bool,

    /// Worker thread count; `None` uses the available parallelism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,

    /// Write `<file>.bak` before overwriting.
    #[serde(default = "default_backup")]
    pub backup: bool,

    #[serde(default = "default_max_passes")]
    pub max_passes: usize,

    /// Deadline for the whole run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_backup() -> bool {
    true
}

fn default_max_passes() -> usize {
    DEFAULT_MAX_PASSES
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

/// Configuration for a single rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleOption {
    /// Rule is enabled/disabled (boolean).
    Enabled(bool),
    /// Rule severity ("error", "warning", "info") or "off".
    Severity(String),
    /// Object with optional `enabled`, `severity`, `fix` and rule options.
    Options(Value),
}

/// Keys of an options object that configure the engine, not the rule.
const RESERVED_KEYS: &[&str] = &["enabled", "severity", "fix"];

/// A rule setting after interpreting its shorthand form.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub enabled: bool,
    /// `None` keeps the rule's default severity.
    pub severity: Option<Severity>,
    /// Whether the rule's fixes may be applied.
    pub fix: bool,
    /// Rule-specific options; an empty object when none are given.
    pub options: Value,
}

impl RuleOption {
    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleOption::Enabled(enabled) => *enabled,
            RuleOption::Severity(s) => s != "off",
            RuleOption::Options(v) => v.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        }
    }

    /// Interprets the option.
    pub fn setting(&self) -> Result<RuleSetting, LinterError> {
        let mut setting = RuleSetting {
            enabled: self.is_enabled(),
            severity: None,
            fix: true,
            options: Value::Object(serde_json::Map::new()),
        };

        match self {
            RuleOption::Enabled(_) => {}
            RuleOption::Severity(s) => {
                if s != "off" {
                    setting.severity = Some(s.parse().map_err(LinterError::config)?);
                }
            }
            RuleOption::Options(Value::Object(map)) => {
                if let Some(severity) = map.get("severity").and_then(Value::as_str) {
                    if severity == "off" {
                        setting.enabled = false;
                    } else {
                        setting.severity = Some(severity.parse().map_err(LinterError::config)?);
                    }
                }
                if let Some(fix) = map.get("fix").and_then(Value::as_bool) {
                    setting.fix = fix;
                }
                let options: serde_json::Map<String, Value> = map
                    .iter()
                    .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                setting.options = Value::Object(options);
            }
            RuleOption::Options(other) => {
                return Err(LinterError::config(format!(
                    "Rule options must be an object, got {other}"
                )));
            }
        }

        Ok(setting)
    }
}

impl LinterConfig {
    /// Creates a new configuration with defaults.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            fix: false,
            dry_run: false,
            jobs: None,
            backup: default_backup(),
            max_passes: DEFAULT_MAX_PASSES,
            timeout_secs: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.marklint.jsonc` and `.marklint.json`; comments and trailing
    /// commas are accepted in both.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Looks for a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Parses configuration from JSONC text with schema validation.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(json, &Default::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        let schema = config_schema()?;
        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(LinterError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Returns the option configured for a rule, by id first, then by name.
    pub fn rule_option(&self, id: &str, name: &str) -> Option<&RuleOption> {
        self.rules.get(id).or_else(|| self.rules.get(name))
    }

    /// Enables or disables a rule, overriding the file setting.
    pub fn set_rule_enabled(&mut self, key: &str, enabled: bool) {
        match self.rules.get_mut(key) {
            Some(RuleOption::Options(Value::Object(map))) => {
                map.insert("enabled".to_string(), Value::Bool(enabled));
            }
            Some(existing) if enabled && existing.is_enabled() => {}
            _ => {
                self.rules
                    .insert(key.to_string(), RuleOption::Enabled(enabled));
            }
        }
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn config_schema() -> Result<&'static Validator, LinterError> {
    if let Some(validator) = CONFIG_SCHEMA.get() {
        return Ok(validator);
    }
    let schema: Value = serde_json::from_str(SCHEMA_JSON)
        .map_err(|e| LinterError::internal(format!("Invalid embedded config schema: {}", e)))?;
    let validator = Validator::new(&schema)
        .map_err(|e| LinterError::internal(format!("Invalid config schema: {}", e)))?;
    Ok(CONFIG_SCHEMA.get_or_init(|| validator))
}
