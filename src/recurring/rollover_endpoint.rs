use axum::{Json, extract::State};

use crate::{
    Error,
    dashboard::DashboardState,
    recurring::rollover::{RolloverReport, run_rollover},
    timezone::local_today,
};

/// A route handler that fires every recurring cost due today in the server's timezone.
///
/// Responds with the report of what fired. Calling it again on the same day fires nothing.
pub async fn rollover_endpoint(
    State(state): State<DashboardState>,
) -> Result<Json<RolloverReport>, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    run_rollover(today, &connection).map(Json)
}
