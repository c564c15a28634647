pub mod config;
pub mod reorder;

pub use config::{
    AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig, PendingConfig,
    PolicyConfig, ReplayConfig,
};
pub use reorder::pending::{sum_pending_order_quantity, PendingOrderLine};
pub use reorder::policy::{
    compute_recommended_order_quantity, compute_with_breakdown, InventoryPolicyParameters,
    ReorderBreakdown, ReorderPolicyError,
};
pub use reorder::replay::{
    replay_inventory, DayRecord, ReplayError, ReplayGuardrailError, ReplayOutcome,
    ReplayParameters, MAX_REPLAY_DAYS,
};
pub use reorder::{DeterministicReorderEngine, ReorderEngine};
