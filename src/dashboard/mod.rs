//! Dashboard module
//!
//! Provides an overview of the ledger: income and expense totals, the
//! balance, a weekday breakdown and per-category totals.

mod aggregation;
mod handlers;

pub use aggregation::{
    CategoryTotal, DAYS_OF_WEEK, WeeklyTotals, balance, sum_by_category, sum_by_day_of_week,
    sum_by_type,
};
pub use handlers::{DashboardState, DashboardSummary, build_dashboard, get_dashboard_endpoint};
