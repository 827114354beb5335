//! The recurring cost registry and the rollover that turns due costs into ledger expenses.

mod core;
mod endpoints;
mod rollover;
mod rollover_endpoint;

pub use core::{
    Period, RecurringCost, RecurringCostBuilder, create_recurring_cost,
    create_recurring_cost_table,
};
pub use endpoints::{
    create_recurring_cost_endpoint, delete_recurring_cost_endpoint, edit_recurring_cost_endpoint,
    get_recurring_costs_endpoint,
};
pub use rollover::{
    FiredCost, Rollover, RolloverFailure, RolloverReport, evaluate_rollover, next_fire_date,
    run_rollover,
};
pub use rollover_endpoint::rollover_endpoint;
