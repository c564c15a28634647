use std::path::Path;

use clap::Args;
use restock_core::{
    replay_inventory, AppConfig, ConfigOverrides, LoadOptions, ReplayError, ReplayOutcome,
    ReplayParameters,
};

use crate::commands::CommandResult;

#[derive(Args, Clone, Debug, Default)]
pub struct ReplayArgs {
    #[arg(long, help = "On-hand inventory before the replay starts")]
    pub current_inventory: Option<f64>,
    #[arg(long, help = "Average daily usage in base units")]
    pub daily_usage: Option<f64>,
    #[arg(long, help = "Level at or below which an order is placed")]
    pub reorder_point: Option<f64>,
    #[arg(long, help = "Quantity ordered when the reorder point is reached")]
    pub order_quantity: Option<f64>,
    #[arg(long, help = "Days between placing an order and its delivery")]
    pub lead_time_days: Option<u32>,
    #[arg(long, help = "Number of days to replay (1..=365)")]
    pub num_days: Option<u32>,
    #[arg(long, help = "One-off pick applied to the starting level")]
    pub picked: Option<f64>,
    #[arg(long, help = "One-off restock applied to the starting level")]
    pub restocked: Option<f64>,
    #[arg(long, help = "Emit the replay outcome as JSON")]
    pub json: bool,
}

pub fn run(config_path: Option<&Path>, args: &ReplayArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        overrides: ConfigOverrides {
            daily_usage: args.daily_usage,
            current_inventory: args.current_inventory,
            reorder_point: args.reorder_point,
            order_quantity: args.order_quantity,
            lead_time_days: args.lead_time_days,
            num_days: args.num_days,
            picked: args.picked,
            restocked: args.restocked,
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "replay",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let replay = ReplayParameters {
        current_inventory: config.replay.current_inventory,
        daily_usage: config.policy.daily_usage,
        reorder_point: config.replay.reorder_point,
        order_quantity: config.replay.order_quantity,
        lead_time_days: config.replay.lead_time_days,
        num_days: config.replay.num_days,
        picked: config.replay.picked,
        restocked: config.replay.restocked,
    };

    let outcome = match replay_inventory(
        &replay,
        &config.policy_parameters(),
        config.pending.order_quantity,
    ) {
        Ok(outcome) => outcome,
        Err(error) => {
            let error_class = match &error {
                ReplayError::Guardrail(_) => "replay_guardrail",
                ReplayError::Policy(policy_error) => policy_error.error_code(),
            };
            return CommandResult::failure("replay", error_class, error.to_string(), 3);
        }
    };

    if args.json {
        return match serde_json::to_string_pretty(&outcome) {
            Ok(output) => CommandResult::success(output),
            Err(error) => CommandResult::failure("replay", "serialization", error.to_string(), 4),
        };
    }

    CommandResult::success(render_table(&outcome))
}

fn render_table(outcome: &ReplayOutcome) -> String {
    let mut lines = Vec::with_capacity(outcome.days.len() + 4);
    lines.push(format!(
        "{:>4}  {:>12}  {:>7}  {:>12}  {:>8}",
        "day", "inventory", "ordered", "post-order", "stockout"
    ));

    for record in &outcome.days {
        lines.push(format!(
            "{:>4}  {:>12.2}  {:>7}  {:>12.2}  {:>8}",
            record.day,
            record.inventory_level,
            if record.order_placed { "yes" } else { "no" },
            record.post_order_inventory,
            if record.stockout { "yes" } else { "no" },
        ));
    }

    lines.push(format!("starting_inventory = {}", outcome.starting_inventory));
    lines.push(format!(
        "first_order_day = {}",
        outcome.first_order_day.map_or("none".to_string(), |day| day.to_string())
    ));
    lines.push(format!("stockout_days = {}", outcome.stockout_days));
    lines.push(format!(
        "recommended_order_quantity = {}",
        outcome.recommended_order_quantity
    ));

    lines.join("\n")
}
