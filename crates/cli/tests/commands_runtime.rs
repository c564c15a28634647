use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use restock_cli::commands::recommend::RecommendArgs;
use restock_cli::commands::replay::ReplayArgs;
use restock_cli::commands::{config, recommend, replay};
use restock_core::PendingOrderLine;
use serde_json::Value;

#[test]
fn recommend_uses_configured_defaults() {
    with_env(&[], || {
        let result = recommend::run(None, &RecommendArgs { json: true, ..Default::default() });
        assert_eq!(result.exit_code, 0, "expected successful recommendation");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["recommended_order_quantity"], 1);
        assert_eq!(payload["target_inventory"], 7.0);
        assert_eq!(payload["adjusted_quantity"], 4.0);
    });
}

#[test]
fn recommend_env_override_raises_the_recommendation() {
    with_env(&[("RESTOCK_POLICY_DAILY_USAGE", "50")], || {
        let result = recommend::run(None, &RecommendArgs { json: true, ..Default::default() });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["target_inventory"], 60.0);
        assert_eq!(payload["adjusted_quantity"], 57.0);
        assert_eq!(payload["recommended_order_quantity"], 2);
    });
}

#[test]
fn recommend_pending_lines_replace_the_configured_quantity() {
    with_env(&[("RESTOCK_POLICY_DAILY_USAGE", "50")], || {
        let args = RecommendArgs {
            json: true,
            pending_lines: vec![
                PendingOrderLine { reference: "PO-1001".to_string(), quantity: 20.0 },
                PendingOrderLine { reference: "PO-1002".to_string(), quantity: 4.0 },
            ],
            ..Default::default()
        };

        let result = recommend::run(None, &args);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["adjusted_quantity"], 36.0);
        assert_eq!(payload["recommended_order_quantity"], 1);
    });
}

#[test]
fn recommend_text_output_lists_the_breakdown() {
    with_env(&[], || {
        let result = recommend::run(None, &RecommendArgs::default());
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("target_inventory = 7"));
        assert!(result.output.contains("recommended_order_quantity = 1"));
    });
}

#[test]
fn recommend_rejects_zero_eaches_quantity_at_the_config_boundary() {
    with_env(&[("RESTOCK_POLICY_EACHES_QUANTITY", "0")], || {
        let result = recommend::run(None, &RecommendArgs { json: true, ..Default::default() });
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn recommend_reads_policy_values_from_a_config_file() {
    with_env(&[], || {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("restock.toml");
        fs::write(
            &path,
            r#"
[policy]
daily_usage = 50.0

[pending]
order_quantity = 3.0
"#,
        )
        .expect("write config file");

        let result =
            recommend::run(Some(&path), &RecommendArgs { json: true, ..Default::default() });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["recommended_order_quantity"], 2);
    });
}

#[test]
fn replay_walks_the_configured_number_of_days() {
    with_env(&[], || {
        let result = replay::run(None, &ReplayArgs { json: true, ..Default::default() });
        assert_eq!(result.exit_code, 0, "expected successful replay");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["starting_inventory"], 79.0);
        assert_eq!(payload["recommended_order_quantity"], 1);
        assert_eq!(payload["days"].as_array().expect("days array").len(), 30);
    });
}

#[test]
fn replay_output_is_deterministic() {
    with_env(&[], || {
        let args = ReplayArgs { json: true, ..Default::default() };
        let run_a = replay::run(None, &args);
        let run_b = replay::run(None, &args);
        assert_eq!(run_a.output, run_b.output);
    });
}

#[test]
fn replay_rejects_day_counts_above_the_limit() {
    with_env(&[], || {
        let result = replay::run(
            None,
            &ReplayArgs { json: true, num_days: Some(366), ..Default::default() },
        );
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "replay");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn replay_text_output_renders_one_row_per_day() {
    with_env(&[], || {
        let result = replay::run(None, &ReplayArgs { num_days: Some(5), ..Default::default() });
        assert_eq!(result.exit_code, 0);

        // Header, five day rows, four summary lines.
        assert_eq!(result.output.lines().count(), 10);
        assert!(result.output.contains("recommended_order_quantity = 1"));
    });
}

#[test]
fn config_attributes_env_overrides_to_their_variable() {
    with_env(&[("RESTOCK_REPLAY_NUM_DAYS", "10")], || {
        let result = config::run(None);
        assert_eq!(result.exit_code, 0);
        assert!(result
            .output
            .contains("- replay.num_days = 10 (source: env (RESTOCK_REPLAY_NUM_DAYS))"));
        assert!(result.output.contains("- policy.daily_usage = 3.3182 (source: default)"));
    });
}

#[test]
fn config_ignores_empty_env_variables_when_attributing_sources() {
    with_env(&[("RESTOCK_POLICY_DAILY_USAGE", "")], || {
        let result = config::run(None);
        assert_eq!(result.exit_code, 0);

        // The loader skips empty values, so the default remains effective
        // and must be reported as the source.
        assert!(result.output.contains("- policy.daily_usage = 3.3182 (source: default)"));
    });
}

#[test]
fn config_attributes_file_values_to_their_file() {
    with_env(&[], || {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("restock.toml");
        fs::write(&path, "[policy]\ndaily_usage = 12.5\n").expect("write config file");

        let result = config::run(Some(&path));
        assert_eq!(result.exit_code, 0);

        let expected = format!("- policy.daily_usage = 12.5 (source: file ({}))", path.display());
        assert!(result.output.contains(&expected));
    });
}

#[test]
fn config_reports_validation_failures() {
    with_env(&[("RESTOCK_POLICY_EACHES_QUANTITY", "-1")], || {
        let result = config::run(None);
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn with_env(vars: &[(&str, &str)], test: impl FnOnce()) {
    let lock = ENV_LOCK.get_or_init(|| Mutex::new(()));
    let _guard = lock.lock().expect("env lock is poisoned");

    for (key, value) in vars {
        env::set_var(key, value);
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(test));

    for (key, _) in vars {
        env::remove_var(key);
    }

    if let Err(panic) = result {
        std::panic::resume_unwind(panic);
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}
