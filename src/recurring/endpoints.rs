//! Route handlers for managing the recurring cost registry.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    database_id::RecurringCostId,
    date_format::day_month_year,
    endpoints::{self, format_endpoint},
    recurring::core::{
        Period, RecurringCost, RecurringCostBuilder, create_recurring_cost, delete_recurring_cost,
        get_recurring_costs, update_recurring_cost,
    },
};

/// The state needed to manage recurring costs.
#[derive(Debug, Clone)]
pub struct RecurringState {
    /// The database connection for the recurring cost registry.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating or replacing a recurring cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringCostForm {
    /// The name of the cost.
    pub name: String,
    /// The amount charged each time, zero or more.
    pub amount: f64,
    /// One of "Daily", "Monthly" or "Yearly".
    ///
    /// Kept as text so that an unknown period is reported as such rather
    /// than as a generic body parsing failure.
    pub period: String,
    /// The next date the cost falls due.
    #[serde(with = "day_month_year")]
    pub next_fire_date: Date,
}

impl RecurringCostForm {
    fn into_builder(self) -> Result<RecurringCostBuilder, Error> {
        let period: Period = self.period.parse()?;

        Ok(RecurringCost::build(
            &self.name,
            self.amount,
            period,
            self.next_fire_date,
        ))
    }
}

/// A route handler that lists the registry in the order the costs were added.
pub async fn get_recurring_costs_endpoint(
    State(state): State<RecurringState>,
) -> Result<Json<Vec<RecurringCost>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_recurring_costs(&connection).map(Json)
}

/// A route handler for adding a recurring cost, responds with the stored cost.
pub async fn create_recurring_cost_endpoint(
    State(state): State<RecurringState>,
    form: Result<Json<RecurringCostForm>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(form) = form?;
    let builder = form.into_builder()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let cost = create_recurring_cost(builder, &connection)?;
    tracing::info!(
        "Added {} recurring cost {} \"{}\" starting {}",
        cost.period,
        cost.id,
        cost.name,
        cost.next_fire_date
    );

    let location = format_endpoint(endpoints::RECURRING_COST, cost.id.as_str());

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(cost)).into_response())
}

/// A route handler for replacing a recurring cost, responds with the updated cost.
pub async fn edit_recurring_cost_endpoint(
    State(state): State<RecurringState>,
    Path(recurring_id): Path<RecurringCostId>,
    form: Result<Json<RecurringCostForm>, JsonRejection>,
) -> Result<Json<RecurringCost>, Error> {
    let Json(form) = form?;
    let builder = form.into_builder()?;
    let cost = RecurringCost {
        id: recurring_id,
        name: builder.name,
        amount: builder.amount,
        period: builder.period,
        next_fire_date: builder.next_fire_date,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_recurring_cost(&cost, &connection)?;
    tracing::info!("Updated recurring cost {}", cost.id);

    Ok(Json(cost))
}

/// A route handler for removing a recurring cost, responds with 204 No Content.
///
/// Expenses the cost already added to the ledger are kept.
pub async fn delete_recurring_cost_endpoint(
    State(state): State<RecurringState>,
    Path(recurring_id): Path<RecurringCostId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_recurring_cost(&recurring_id, &connection)? {
        0 => tracing::debug!("Recurring cost {recurring_id} was already gone, nothing to delete"),
        _ => tracing::info!("Deleted recurring cost {recurring_id}"),
    }

    Ok(StatusCode::NO_CONTENT)
}
