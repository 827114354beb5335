//! Dashboard HTTP handlers.
//!
//! Fetching the dashboard first rolls over any recurring costs due today, so
//! the figures always include expenses that fell due since the last visit.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    dashboard::aggregation::{
        CategoryTotal, WeeklyTotals, balance, sum_by_category, sum_by_day_of_week, sum_by_type,
    },
    recurring::{RolloverReport, run_rollover},
    timezone::local_today,
    transaction::{TransactionType, get_transactions},
};

/// The state needed for the dashboard and for rolling over recurring costs.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// Total income minus total expenses.
    pub balance: f64,
    /// Income and expenses by weekday.
    pub weekly: WeeklyTotals,
    /// Totals per category, sorted by category label.
    pub categories: Vec<CategoryTotal>,
    /// The recurring costs that were rolled over before the figures were calculated.
    pub rollover: RolloverReport,
}

/// Roll over recurring costs due on `today`, then summarise the ledger.
///
/// # Errors
/// Returns an error if the registry or the ledger cannot be read.
pub fn build_dashboard(today: Date, connection: &Connection) -> Result<DashboardSummary, Error> {
    let rollover = run_rollover(today, connection)?;
    let transactions = get_transactions(connection)?;

    Ok(DashboardSummary {
        total_income: sum_by_type(&transactions, TransactionType::Income),
        total_expenses: sum_by_type(&transactions, TransactionType::Expense),
        balance: balance(&transactions),
        weekly: sum_by_day_of_week(&transactions),
        categories: sum_by_category(&transactions),
        rollover,
    })
}

/// A route handler that responds with the dashboard figures.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
) -> Result<Json<DashboardSummary>, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    build_dashboard(today, &connection).map(Json)
}
