use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use restock_core::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

pub fn run(config_path: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let file_path = detect_config_path(config_path);
    let file_doc = load_config_file_doc(file_path.as_deref());

    let rows: Vec<(&str, String, Vec<&str>)> = vec![
        (
            "policy.daily_usage",
            config.policy.daily_usage.to_string(),
            vec!["RESTOCK_POLICY_DAILY_USAGE"],
        ),
        (
            "policy.target_inventory_multiplier",
            config.policy.target_inventory_multiplier.to_string(),
            vec!["RESTOCK_POLICY_TARGET_INVENTORY_MULTIPLIER"],
        ),
        (
            "policy.target_inventory_threshold",
            config.policy.target_inventory_threshold.to_string(),
            vec!["RESTOCK_POLICY_TARGET_INVENTORY_THRESHOLD"],
        ),
        (
            "policy.maximum_quantity",
            config.policy.maximum_quantity.to_string(),
            vec!["RESTOCK_POLICY_MAXIMUM_QUANTITY"],
        ),
        (
            "policy.eaches_quantity",
            config.policy.eaches_quantity.to_string(),
            vec!["RESTOCK_POLICY_EACHES_QUANTITY"],
        ),
        (
            "pending.order_quantity",
            config.pending.order_quantity.to_string(),
            vec!["RESTOCK_PENDING_ORDER_QUANTITY"],
        ),
        (
            "replay.current_inventory",
            config.replay.current_inventory.to_string(),
            vec!["RESTOCK_REPLAY_CURRENT_INVENTORY"],
        ),
        (
            "replay.reorder_point",
            config.replay.reorder_point.to_string(),
            vec!["RESTOCK_REPLAY_REORDER_POINT"],
        ),
        (
            "replay.order_quantity",
            config.replay.order_quantity.to_string(),
            vec!["RESTOCK_REPLAY_ORDER_QUANTITY"],
        ),
        (
            "replay.lead_time_days",
            config.replay.lead_time_days.to_string(),
            vec!["RESTOCK_REPLAY_LEAD_TIME_DAYS"],
        ),
        ("replay.num_days", config.replay.num_days.to_string(), vec!["RESTOCK_REPLAY_NUM_DAYS"]),
        ("replay.picked", config.replay.picked.to_string(), vec!["RESTOCK_REPLAY_PICKED"]),
        ("replay.restocked", config.replay.restocked.to_string(), vec!["RESTOCK_REPLAY_RESTOCKED"]),
        (
            "logging.level",
            config.logging.level.clone(),
            vec!["RESTOCK_LOGGING_LEVEL", "RESTOCK_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            vec!["RESTOCK_LOGGING_FORMAT", "RESTOCK_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in rows {
        let source = field_source(key, &env_keys, file_doc.as_ref(), file_path.as_deref());
        lines.push(format!("- {key} = {value} (source: {source})"));
    }

    CommandResult::success(lines.join("\n"))
}

fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("restock.toml"), PathBuf::from("config/restock.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // Same filter as the loader: empty or whitespace-only variables are
    // ignored there and must not be attributed as the source here.
    for env_key in env_keys {
        let populated =
            env::var(env_key).is_ok_and(|value| !value.trim().is_empty());
        if populated {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
