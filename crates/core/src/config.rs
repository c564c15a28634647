use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reorder::policy::InventoryPolicyParameters;
use crate::reorder::replay::MAX_REPLAY_DAYS;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub policy: PolicyConfig,
    pub pending: PendingConfig,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolicyConfig {
    pub daily_usage: f64,
    pub target_inventory_multiplier: f64,
    pub target_inventory_threshold: f64,
    pub maximum_quantity: f64,
    pub eaches_quantity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingConfig {
    pub order_quantity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReplayConfig {
    pub current_inventory: f64,
    pub reorder_point: f64,
    pub order_quantity: f64,
    pub lead_time_days: u32,
    pub num_days: u32,
    pub picked: f64,
    pub restocked: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub daily_usage: Option<f64>,
    pub target_inventory_multiplier: Option<f64>,
    pub target_inventory_threshold: Option<f64>,
    pub maximum_quantity: Option<f64>,
    pub eaches_quantity: Option<f64>,
    pub pending_order_quantity: Option<f64>,
    pub current_inventory: Option<f64>,
    pub reorder_point: Option<f64>,
    pub order_quantity: Option<f64>,
    pub lead_time_days: Option<u32>,
    pub num_days: Option<u32>,
    pub picked: Option<f64>,
    pub restocked: Option<f64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        // Defaults mirror the reference intake form for a single tracked item.
        Self {
            policy: PolicyConfig {
                daily_usage: 3.3182,
                target_inventory_multiplier: 1.2,
                target_inventory_threshold: 7.0,
                maximum_quantity: 108.0,
                eaches_quantity: 36.0,
            },
            pending: PendingConfig { order_quantity: 3.0 },
            replay: ReplayConfig {
                current_inventory: 79.0,
                reorder_point: 22.0,
                order_quantity: 1.0,
                lead_time_days: 5,
                num_days: 30,
                picked: 3.0,
                restocked: 3.0,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("restock.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Effective policy parameters in the shape the calculator takes.
    pub fn policy_parameters(&self) -> InventoryPolicyParameters {
        InventoryPolicyParameters {
            daily_usage: self.policy.daily_usage,
            target_inventory_multiplier: self.policy.target_inventory_multiplier,
            target_inventory_threshold: self.policy.target_inventory_threshold,
            maximum_quantity: self.policy.maximum_quantity,
            eaches_quantity: self.policy.eaches_quantity,
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(policy) = patch.policy {
            if let Some(daily_usage) = policy.daily_usage {
                self.policy.daily_usage = daily_usage;
            }
            if let Some(multiplier) = policy.target_inventory_multiplier {
                self.policy.target_inventory_multiplier = multiplier;
            }
            if let Some(threshold) = policy.target_inventory_threshold {
                self.policy.target_inventory_threshold = threshold;
            }
            if let Some(maximum_quantity) = policy.maximum_quantity {
                self.policy.maximum_quantity = maximum_quantity;
            }
            if let Some(eaches_quantity) = policy.eaches_quantity {
                self.policy.eaches_quantity = eaches_quantity;
            }
        }

        if let Some(pending) = patch.pending {
            if let Some(order_quantity) = pending.order_quantity {
                self.pending.order_quantity = order_quantity;
            }
        }

        if let Some(replay) = patch.replay {
            if let Some(current_inventory) = replay.current_inventory {
                self.replay.current_inventory = current_inventory;
            }
            if let Some(reorder_point) = replay.reorder_point {
                self.replay.reorder_point = reorder_point;
            }
            if let Some(order_quantity) = replay.order_quantity {
                self.replay.order_quantity = order_quantity;
            }
            if let Some(lead_time_days) = replay.lead_time_days {
                self.replay.lead_time_days = lead_time_days;
            }
            if let Some(num_days) = replay.num_days {
                self.replay.num_days = num_days;
            }
            if let Some(picked) = replay.picked {
                self.replay.picked = picked;
            }
            if let Some(restocked) = replay.restocked {
                self.replay.restocked = restocked;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("RESTOCK_POLICY_DAILY_USAGE") {
            self.policy.daily_usage = parse_f64("RESTOCK_POLICY_DAILY_USAGE", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_POLICY_TARGET_INVENTORY_MULTIPLIER") {
            self.policy.target_inventory_multiplier =
                parse_f64("RESTOCK_POLICY_TARGET_INVENTORY_MULTIPLIER", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_POLICY_TARGET_INVENTORY_THRESHOLD") {
            self.policy.target_inventory_threshold =
                parse_f64("RESTOCK_POLICY_TARGET_INVENTORY_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_POLICY_MAXIMUM_QUANTITY") {
            self.policy.maximum_quantity = parse_f64("RESTOCK_POLICY_MAXIMUM_QUANTITY", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_POLICY_EACHES_QUANTITY") {
            self.policy.eaches_quantity = parse_f64("RESTOCK_POLICY_EACHES_QUANTITY", &value)?;
        }

        if let Some(value) = read_env("RESTOCK_PENDING_ORDER_QUANTITY") {
            self.pending.order_quantity = parse_f64("RESTOCK_PENDING_ORDER_QUANTITY", &value)?;
        }

        if let Some(value) = read_env("RESTOCK_REPLAY_CURRENT_INVENTORY") {
            self.replay.current_inventory =
                parse_f64("RESTOCK_REPLAY_CURRENT_INVENTORY", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_REPLAY_REORDER_POINT") {
            self.replay.reorder_point = parse_f64("RESTOCK_REPLAY_REORDER_POINT", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_REPLAY_ORDER_QUANTITY") {
            self.replay.order_quantity = parse_f64("RESTOCK_REPLAY_ORDER_QUANTITY", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_REPLAY_LEAD_TIME_DAYS") {
            self.replay.lead_time_days = parse_u32("RESTOCK_REPLAY_LEAD_TIME_DAYS", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_REPLAY_NUM_DAYS") {
            self.replay.num_days = parse_u32("RESTOCK_REPLAY_NUM_DAYS", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_REPLAY_PICKED") {
            self.replay.picked = parse_f64("RESTOCK_REPLAY_PICKED", &value)?;
        }
        if let Some(value) = read_env("RESTOCK_REPLAY_RESTOCKED") {
            self.replay.restocked = parse_f64("RESTOCK_REPLAY_RESTOCKED", &value)?;
        }

        let log_level = read_env("RESTOCK_LOGGING_LEVEL").or_else(|| read_env("RESTOCK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("RESTOCK_LOGGING_FORMAT").or_else(|| read_env("RESTOCK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(daily_usage) = overrides.daily_usage {
            self.policy.daily_usage = daily_usage;
        }
        if let Some(multiplier) = overrides.target_inventory_multiplier {
            self.policy.target_inventory_multiplier = multiplier;
        }
        if let Some(threshold) = overrides.target_inventory_threshold {
            self.policy.target_inventory_threshold = threshold;
        }
        if let Some(maximum_quantity) = overrides.maximum_quantity {
            self.policy.maximum_quantity = maximum_quantity;
        }
        if let Some(eaches_quantity) = overrides.eaches_quantity {
            self.policy.eaches_quantity = eaches_quantity;
        }
        if let Some(pending_order_quantity) = overrides.pending_order_quantity {
            self.pending.order_quantity = pending_order_quantity;
        }
        if let Some(current_inventory) = overrides.current_inventory {
            self.replay.current_inventory = current_inventory;
        }
        if let Some(reorder_point) = overrides.reorder_point {
            self.replay.reorder_point = reorder_point;
        }
        if let Some(order_quantity) = overrides.order_quantity {
            self.replay.order_quantity = order_quantity;
        }
        if let Some(lead_time_days) = overrides.lead_time_days {
            self.replay.lead_time_days = lead_time_days;
        }
        if let Some(num_days) = overrides.num_days {
            self.replay.num_days = num_days;
        }
        if let Some(picked) = overrides.picked {
            self.replay.picked = picked;
        }
        if let Some(restocked) = overrides.restocked {
            self.replay.restocked = restocked;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_policy(&self.policy)?;
        validate_pending(&self.pending)?;
        validate_replay(&self.replay)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("restock.toml"), PathBuf::from("config/restock.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_policy(policy: &PolicyConfig) -> Result<(), ConfigError> {
    let fields = [
        ("policy.daily_usage", policy.daily_usage),
        ("policy.target_inventory_multiplier", policy.target_inventory_multiplier),
        ("policy.target_inventory_threshold", policy.target_inventory_threshold),
        ("policy.maximum_quantity", policy.maximum_quantity),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(ConfigError::Validation(format!("{name} must be a finite number")));
        }
    }

    if !policy.eaches_quantity.is_finite() || policy.eaches_quantity <= 0.0 {
        return Err(ConfigError::Validation(
            "policy.eaches_quantity must be a finite number greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_pending(pending: &PendingConfig) -> Result<(), ConfigError> {
    if !pending.order_quantity.is_finite() {
        return Err(ConfigError::Validation(
            "pending.order_quantity must be a finite number".to_string(),
        ));
    }

    Ok(())
}

fn validate_replay(replay: &ReplayConfig) -> Result<(), ConfigError> {
    let fields = [
        ("replay.current_inventory", replay.current_inventory),
        ("replay.reorder_point", replay.reorder_point),
        ("replay.order_quantity", replay.order_quantity),
        ("replay.picked", replay.picked),
        ("replay.restocked", replay.restocked),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(ConfigError::Validation(format!("{name} must be a finite number")));
        }
    }

    if replay.num_days == 0 || replay.num_days > MAX_REPLAY_DAYS {
        return Err(ConfigError::Validation(format!(
            "replay.num_days must be in range 1..={MAX_REPLAY_DAYS}"
        )));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    policy: Option<PolicyPatch>,
    pending: Option<PendingPatch>,
    replay: Option<ReplayPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyPatch {
    daily_usage: Option<f64>,
    target_inventory_multiplier: Option<f64>,
    target_inventory_threshold: Option<f64>,
    maximum_quantity: Option<f64>,
    eaches_quantity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PendingPatch {
    order_quantity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplayPatch {
    current_inventory: Option<f64>,
    reorder_point: Option<f64>,
    order_quantity: Option<f64>,
    lead_time_days: Option<u32>,
    num_days: Option<u32>,
    picked: Option<f64>,
    restocked: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
