use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Inventory policy knobs for a single item. All quantities are in base
/// ("eaches") units except `eaches_quantity`, which is the pack size used to
/// convert the final recommendation into order-pack units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryPolicyParameters {
    pub daily_usage: f64,
    pub target_inventory_multiplier: f64,
    pub target_inventory_threshold: f64,
    pub maximum_quantity: f64,
    pub eaches_quantity: f64,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ReorderPolicyError {
    #[error("eaches_quantity must be greater than zero, got {eaches_quantity}")]
    InvalidEachesQuantity { eaches_quantity: f64 },
}

impl ReorderPolicyError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEachesQuantity { .. } => "invalid_eaches_quantity",
        }
    }
}

/// Intermediate values of the recommendation computation, for reporting and
/// audit output. `recommended_order_quantity` is in order-pack units; the
/// other fields are in base units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReorderBreakdown {
    pub average_daily_use: f64,
    pub target_inventory: f64,
    pub adjusted_quantity: f64,
    pub recommended_order_quantity: u32,
}

pub fn compute_recommended_order_quantity(
    params: &InventoryPolicyParameters,
    pending_order_quantity: f64,
) -> Result<u32, ReorderPolicyError> {
    compute_with_breakdown(params, pending_order_quantity)
        .map(|breakdown| breakdown.recommended_order_quantity)
}

pub fn compute_with_breakdown(
    params: &InventoryPolicyParameters,
    pending_order_quantity: f64,
) -> Result<ReorderBreakdown, ReorderPolicyError> {
    if !params.eaches_quantity.is_finite() || params.eaches_quantity <= 0.0 {
        return Err(ReorderPolicyError::InvalidEachesQuantity {
            eaches_quantity: params.eaches_quantity,
        });
    }

    let average_daily_use = params.daily_usage.max(0.0);

    // Inner max applies the threshold floor, outer min applies the cap; the
    // cap wins when the two conflict. The ordering is load-bearing.
    let target_inventory = (average_daily_use * params.target_inventory_multiplier)
        .max(params.target_inventory_threshold)
        .min(params.maximum_quantity);

    let adjusted_quantity = (target_inventory - pending_order_quantity.max(0.0)).max(0.0);

    let recommended = (adjusted_quantity / params.eaches_quantity).round().max(1.0);
    let recommended_order_quantity = recommended as u32;

    info!(
        event_name = "reorder.recommendation.computed",
        recommended_order_quantity,
        target_inventory,
        adjusted_quantity,
        "calculated recommended order quantity"
    );

    Ok(ReorderBreakdown {
        average_daily_use,
        target_inventory,
        adjusted_quantity,
        recommended_order_quantity,
    })
}
