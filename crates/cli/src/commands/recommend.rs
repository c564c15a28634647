use std::path::Path;

use clap::Args;
use restock_core::{
    compute_with_breakdown, sum_pending_order_quantity, AppConfig, ConfigOverrides, LoadOptions,
    PendingOrderLine,
};

use crate::commands::CommandResult;

#[derive(Args, Clone, Debug, Default)]
pub struct RecommendArgs {
    #[arg(long, help = "Average daily usage in base units")]
    pub daily_usage: Option<f64>,
    #[arg(long, help = "Multiplier applied to daily usage to derive the target level")]
    pub target_inventory_multiplier: Option<f64>,
    #[arg(long, help = "Minimum allowed target inventory level")]
    pub target_inventory_threshold: Option<f64>,
    #[arg(long, help = "Absolute cap on the target inventory level")]
    pub maximum_quantity: Option<f64>,
    #[arg(long, help = "Base units per order pack")]
    pub eaches_quantity: Option<f64>,
    #[arg(
        long = "pending-line",
        value_name = "REF=QTY",
        value_parser = parse_pending_line,
        help = "Outstanding order line, repeatable; replaces the configured pending quantity"
    )]
    pub pending_lines: Vec<PendingOrderLine>,
    #[arg(long, help = "Emit the full breakdown as JSON")]
    pub json: bool,
}

pub fn run(config_path: Option<&Path>, args: &RecommendArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        overrides: ConfigOverrides {
            daily_usage: args.daily_usage,
            target_inventory_multiplier: args.target_inventory_multiplier,
            target_inventory_threshold: args.target_inventory_threshold,
            maximum_quantity: args.maximum_quantity,
            eaches_quantity: args.eaches_quantity,
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let pending_order_quantity = if args.pending_lines.is_empty() {
        config.pending.order_quantity
    } else {
        sum_pending_order_quantity(&args.pending_lines)
    };

    let breakdown =
        match compute_with_breakdown(&config.policy_parameters(), pending_order_quantity) {
            Ok(breakdown) => breakdown,
            Err(error) => {
                return CommandResult::failure("recommend", error.error_code(), error.to_string(), 3);
            }
        };

    if args.json {
        return match serde_json::to_string_pretty(&breakdown) {
            Ok(output) => CommandResult::success(output),
            Err(error) => {
                CommandResult::failure("recommend", "serialization", error.to_string(), 4)
            }
        };
    }

    CommandResult::success(
        [
            format!("pending_order_quantity = {pending_order_quantity}"),
            format!("average_daily_use = {}", breakdown.average_daily_use),
            format!("target_inventory = {}", breakdown.target_inventory),
            format!("adjusted_quantity = {}", breakdown.adjusted_quantity),
            format!("recommended_order_quantity = {}", breakdown.recommended_order_quantity),
        ]
        .join("\n"),
    )
}

fn parse_pending_line(value: &str) -> Result<PendingOrderLine, String> {
    let (reference, quantity) = value
        .split_once('=')
        .ok_or_else(|| format!("expected REF=QTY, got `{value}`"))?;

    let reference = reference.trim();
    if reference.is_empty() {
        return Err(format!("pending line reference cannot be empty in `{value}`"));
    }

    let quantity = quantity
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("pending line quantity is not a number in `{value}`"))?;

    Ok(PendingOrderLine { reference: reference.to_string(), quantity })
}
