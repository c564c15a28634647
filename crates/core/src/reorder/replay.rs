use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::reorder::policy::{
    compute_recommended_order_quantity, InventoryPolicyParameters, ReorderPolicyError,
};

pub const MAX_REPLAY_DAYS: u32 = 365;

/// Inputs for a deterministic day-by-day inventory walk. Quantities are in
/// base units; `picked` and `restocked` are one-off adjustments applied to
/// the starting level before day one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayParameters {
    pub current_inventory: f64,
    pub daily_usage: f64,
    pub reorder_point: f64,
    pub order_quantity: f64,
    pub lead_time_days: u32,
    pub num_days: u32,
    pub picked: f64,
    pub restocked: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: u32,
    /// Level after the day's usage draw-down, before any delivery.
    pub inventory_level: f64,
    pub order_placed: bool,
    /// Level after any order due today has been delivered.
    pub post_order_inventory: f64,
    pub stockout: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub starting_inventory: f64,
    pub recommended_order_quantity: u32,
    pub days: Vec<DayRecord>,
    pub first_order_day: Option<u32>,
    pub stockout_days: u32,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ReplayGuardrailError {
    #[error("replay requires at least one day")]
    ZeroDays,
    #[error("replay of {requested} days exceeds the {max_allowed} day limit")]
    TooManyDays { requested: u32, max_allowed: u32 },
    #[error("replay parameter `{name}` must be a finite number")]
    NonFiniteParameter { name: String },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ReplayError {
    #[error(transparent)]
    Guardrail(#[from] ReplayGuardrailError),
    #[error(transparent)]
    Policy(#[from] ReorderPolicyError),
}

/// Walks inventory forward `num_days` days: usage draws the level down, an
/// order is placed when the level reaches the reorder point with nothing
/// outstanding, and that order is delivered once its lead time elapses. At
/// most one order is outstanding at a time. The level clamps at zero; a day
/// that would have gone negative is flagged as a stockout.
pub fn replay_inventory(
    replay: &ReplayParameters,
    policy: &InventoryPolicyParameters,
    pending_order_quantity: f64,
) -> Result<ReplayOutcome, ReplayError> {
    validate_replay_parameters(replay)?;

    let recommended_order_quantity =
        compute_recommended_order_quantity(policy, pending_order_quantity)?;

    let starting_inventory = replay.current_inventory + replay.restocked - replay.picked;
    let daily_usage = replay.daily_usage.max(0.0);

    let mut inventory = starting_inventory;
    let mut arrival_day: Option<u32> = None;
    let mut first_order_day = None;
    let mut stockout_days = 0;
    let mut days = Vec::with_capacity(replay.num_days as usize);

    for day in 1..=replay.num_days {
        inventory -= daily_usage;
        let stockout = inventory < 0.0;
        if stockout {
            inventory = 0.0;
            stockout_days += 1;
        }
        let inventory_level = inventory;

        if arrival_day == Some(day) {
            inventory += replay.order_quantity;
            arrival_day = None;
        }

        let order_placed = arrival_day.is_none() && inventory <= replay.reorder_point;
        if order_placed {
            first_order_day.get_or_insert(day);
            if replay.lead_time_days == 0 {
                inventory += replay.order_quantity;
            } else {
                // Saturates on extreme lead times: the order stays
                // outstanding and is simply never delivered in this replay.
                arrival_day = Some(day.saturating_add(replay.lead_time_days));
            }
        }

        days.push(DayRecord {
            day,
            inventory_level,
            order_placed,
            post_order_inventory: inventory,
            stockout,
        });
    }

    info!(
        event_name = "reorder.replay.completed",
        num_days = replay.num_days,
        stockout_days,
        recommended_order_quantity,
        "inventory replay completed"
    );

    Ok(ReplayOutcome {
        starting_inventory,
        recommended_order_quantity,
        days,
        first_order_day,
        stockout_days,
    })
}

fn validate_replay_parameters(replay: &ReplayParameters) -> Result<(), ReplayGuardrailError> {
    if replay.num_days == 0 {
        return Err(ReplayGuardrailError::ZeroDays);
    }
    if replay.num_days > MAX_REPLAY_DAYS {
        return Err(ReplayGuardrailError::TooManyDays {
            requested: replay.num_days,
            max_allowed: MAX_REPLAY_DAYS,
        });
    }

    let fields = [
        ("current_inventory", replay.current_inventory),
        ("daily_usage", replay.daily_usage),
        ("reorder_point", replay.reorder_point),
        ("order_quantity", replay.order_quantity),
        ("picked", replay.picked),
        ("restocked", replay.restocked),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(ReplayGuardrailError::NonFiniteParameter { name: name.to_string() });
        }
    }

    Ok(())
}
