pub mod pending;
pub mod policy;
pub mod replay;

use self::policy::{
    compute_with_breakdown, InventoryPolicyParameters, ReorderBreakdown, ReorderPolicyError,
};

/// Seam for anything that turns policy parameters into an order
/// recommendation. Report generators and other consumers depend on this
/// trait rather than on the concrete computation.
pub trait ReorderEngine: Send + Sync {
    fn recommend(
        &self,
        params: &InventoryPolicyParameters,
        pending_order_quantity: f64,
    ) -> Result<ReorderBreakdown, ReorderPolicyError>;
}

#[derive(Default)]
pub struct DeterministicReorderEngine;

impl ReorderEngine for DeterministicReorderEngine {
    fn recommend(
        &self,
        params: &InventoryPolicyParameters,
        pending_order_quantity: f64,
    ) -> Result<ReorderBreakdown, ReorderPolicyError> {
        compute_with_breakdown(params, pending_order_quantity)
    }
}
