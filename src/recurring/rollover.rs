//! Rolls due recurring costs over into the ledger.
//!
//! A recurring cost fires when its next fire date is exactly today. Firing
//! appends one expense to the ledger and moves the next fire date forward,
//! so evaluating the registry again on the same day does nothing.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    database_id::RecurringCostId,
    date_format::day_month_year,
    recurring::core::{Period, RecurringCost, get_recurring_costs, set_next_fire_date},
    transaction::{
        RECURRING_CATEGORY, Transaction, TransactionBuilder, TransactionType, create_transaction,
    },
};

/// The changes needed to fire one recurring cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollover {
    /// The cost being fired.
    pub recurring_cost_id: RecurringCostId,
    /// The expense to append to the ledger.
    pub transaction: TransactionBuilder,
    /// The date the cost will fire next, always after the firing date.
    pub next_fire_date: Date,
}

/// A recurring cost that fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiredCost {
    /// The cost that fired.
    pub recurring_cost_id: RecurringCostId,
    /// The expense added to the ledger.
    pub transaction: Transaction,
    /// When the cost will fire next.
    #[serde(with = "day_month_year")]
    pub next_fire_date: Date,
}

/// A recurring cost that was due but could not be fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverFailure {
    /// The cost that could not be fired.
    pub recurring_cost_id: RecurringCostId,
    /// Why the cost could not be fired.
    pub reason: String,
}

/// The outcome of evaluating the registry on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverReport {
    /// The date the registry was evaluated for.
    #[serde(with = "day_month_year")]
    pub date: Date,
    /// The costs that fired, in registry order.
    pub fired: Vec<FiredCost>,
    /// The due costs that could not be fired.
    pub failures: Vec<RolloverFailure>,
}

/// Calculate when a cost with `period` that fired on `today` should fire next.
///
/// - Daily costs fire again tomorrow.
/// - Monthly costs fire again on the last day of next month.
/// - Yearly costs fire again on the 31st of December next year.
///
/// The result is always later than `today`.
///
/// # Errors
/// Returns [Error::DateOutOfRange] if the date cannot be represented.
pub fn next_fire_date(period: Period, today: Date) -> Result<Date, Error> {
    match period {
        Period::Daily => today.next_day().ok_or(Error::DateOutOfRange),
        Period::Monthly => last_day_of_next_month(today),
        Period::Yearly => Date::from_calendar_date(today.year() + 1, Month::December, 31)
            .map_err(|_| Error::DateOutOfRange),
    }
}

fn last_day_of_next_month(today: Date) -> Result<Date, Error> {
    // The day before the first of the month after next.
    let (year, month) = match today.month() {
        Month::November => (today.year() + 1, Month::January),
        Month::December => (today.year() + 1, Month::February),
        month => (today.year(), month.next().next()),
    };

    Date::from_calendar_date(year, month, 1)
        .ok()
        .and_then(Date::previous_day)
        .ok_or(Error::DateOutOfRange)
}

/// Work out what firing `cost` on `today` involves.
///
/// Returns `Ok(None)` if the cost is not due today.
///
/// # Errors
/// Returns [Error::DateOutOfRange] if the next fire date cannot be represented.
pub fn plan_rollover(cost: &RecurringCost, today: Date) -> Result<Option<Rollover>, Error> {
    if cost.next_fire_date != today {
        return Ok(None);
    }

    let next_fire_date = next_fire_date(cost.period, today)?;
    let transaction = Transaction::build(cost.amount, today, &cost.name)
        .transaction_type(TransactionType::Expense)
        .category(RECURRING_CATEGORY);

    Ok(Some(Rollover {
        recurring_cost_id: cost.id.clone(),
        transaction,
        next_fire_date,
    }))
}

/// Evaluate every cost in `costs` against `today`.
///
/// Returns one entry per cost that is due, in the same order as `costs`.
/// Costs are evaluated independently, one failing does not affect the others.
pub fn evaluate_rollover(
    today: Date,
    costs: &[RecurringCost],
) -> Vec<Result<Rollover, RolloverFailure>> {
    costs
        .iter()
        .filter_map(|cost| match plan_rollover(cost, today) {
            Ok(Some(rollover)) => Some(Ok(rollover)),
            Ok(None) => None,
            Err(error) => Some(Err(RolloverFailure {
                recurring_cost_id: cost.id.clone(),
                reason: error.to_string(),
            })),
        })
        .collect()
}

/// Append the expense and move the schedule for `rollover` as a single database transaction.
///
/// # Errors
/// Returns an error if either write fails, in which case neither is kept.
pub fn apply_rollover(rollover: Rollover, connection: &Connection) -> Result<FiredCost, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let transaction = create_transaction(rollover.transaction, &sql_transaction)?;
    set_next_fire_date(
        &rollover.recurring_cost_id,
        rollover.next_fire_date,
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(FiredCost {
        recurring_cost_id: rollover.recurring_cost_id,
        transaction,
        next_fire_date: rollover.next_fire_date,
    })
}

/// Fire every recurring cost that is due on `today`.
///
/// This is the activation hook for the dashboard and the rollover endpoint.
/// There is no record of previous runs: a cost fired earlier today has
/// already been moved past today and will not fire twice.
///
/// # Errors
/// Returns an error if the registry cannot be read. Failures for individual
/// costs are logged and collected in [RolloverReport::failures] instead.
pub fn run_rollover(today: Date, connection: &Connection) -> Result<RolloverReport, Error> {
    let costs = get_recurring_costs(connection)?;

    let mut report = RolloverReport {
        date: today,
        fired: Vec::new(),
        failures: Vec::new(),
    };

    for planned in evaluate_rollover(today, &costs) {
        let rollover = match planned {
            Ok(rollover) => rollover,
            Err(failure) => {
                tracing::error!(
                    "Could not schedule recurring cost {}: {}",
                    failure.recurring_cost_id,
                    failure.reason
                );
                report.failures.push(failure);
                continue;
            }
        };

        let recurring_cost_id = rollover.recurring_cost_id.clone();
        match apply_rollover(rollover, connection) {
            Ok(fired) => {
                tracing::info!(
                    "Recurring cost {} fired on {today}, next due on {}",
                    fired.recurring_cost_id,
                    fired.next_fire_date
                );
                report.fired.push(fired);
            }
            Err(error) => {
                tracing::error!("Could not fire recurring cost {recurring_cost_id}: {error}");
                report.failures.push(RolloverFailure {
                    recurring_cost_id,
                    reason: error.to_string(),
                });
            }
        }
    }

    Ok(report)
}



#[cfg(test)]
mod run_tests {
    use time::macros::date;

    use crate::{
        recurring::{
            core::{Period, RecurringCost, create_recurring_cost, get_recurring_cost},
            rollover::run_rollover,
        },
        test_utils::get_test_connection,
        transaction::{
            RECURRING_CATEGORY, Transaction, TransactionType, count_transactions,
            create_transaction, get_transactions,
        },
    };

    #[test]
    fn fires_due_costs_and_advances_schedule() {
        let conn = get_test_connection();
        let today = date!(2024 - 01 - 31);
        let rent = create_recurring_cost(
            RecurringCost::build("Rent", 450.0, Period::Monthly, today),
            &conn,
        )
        .unwrap();
        let gym = create_recurring_cost(
            RecurringCost::build("Gym", 20.0, Period::Monthly, date!(2024 - 02 - 29)),
            &conn,
        )
        .unwrap();

        let report = run_rollover(today, &conn).unwrap();

        assert_eq!(report.date, today);
        assert!(report.failures.is_empty());
        assert_eq!(report.fired.len(), 1);
        let fired = &report.fired[0];
        assert_eq!(fired.recurring_cost_id, rent.id);
        assert_eq!(fired.next_fire_date, date!(2024 - 02 - 29));
        assert_eq!(fired.transaction.description, "Rent");
        assert_eq!(fired.transaction.amount, 450.0);
        assert_eq!(fired.transaction.transaction_type, TransactionType::Expense);
        assert_eq!(fired.transaction.category, RECURRING_CATEGORY);
        assert_eq!(fired.transaction.date, today);

        assert_eq!(get_transactions(&conn).unwrap(), vec![fired.transaction.clone()]);
        assert_eq!(
            get_recurring_cost(&rent.id, &conn).unwrap().next_fire_date,
            date!(2024 - 02 - 29)
        );
        assert_eq!(get_recurring_cost(&gym.id, &conn).unwrap(), gym);
    }

    #[test]
    fn running_twice_on_same_day_does_not_double_fire() {
        let conn = get_test_connection();
        let today = date!(2024 - 03 - 15);
        for period in [Period::Daily, Period::Monthly, Period::Yearly] {
            create_recurring_cost(
                RecurringCost::build(period.as_str(), 5.0, period, today),
                &conn,
            )
            .unwrap();
        }

        let first = run_rollover(today, &conn).unwrap();
        let second = run_rollover(today, &conn).unwrap();

        assert_eq!(first.fired.len(), 3);
        assert!(second.fired.is_empty());
        assert!(second.failures.is_empty());
        assert_eq!(count_transactions(&conn).unwrap(), 3);
    }

    #[test]
    fn daily_cost_fires_again_tomorrow() {
        let conn = get_test_connection();
        let today = date!(2024 - 02 - 28);
        create_recurring_cost(
            RecurringCost::build("Coffee", 4.5, Period::Daily, today),
            &conn,
        )
        .unwrap();

        run_rollover(today, &conn).unwrap();
        let tomorrow = run_rollover(date!(2024 - 02 - 29), &conn).unwrap();

        assert_eq!(tomorrow.fired.len(), 1);
        assert_eq!(tomorrow.fired[0].next_fire_date, date!(2024 - 03 - 01));
        assert_eq!(count_transactions(&conn).unwrap(), 2);
    }

    #[test]
    fn keeps_existing_ledger_entries() {
        let conn = get_test_connection();
        let today = date!(2024 - 01 - 31);
        let existing = create_transaction(
            Transaction::build(1000.0, today, "Salary")
                .transaction_type(TransactionType::Income),
            &conn,
        )
        .unwrap();
        create_recurring_cost(
            RecurringCost::build("Rent", 450.0, Period::Monthly, today),
            &conn,
        )
        .unwrap();

        let report = run_rollover(today, &conn).unwrap();

        assert_eq!(
            get_transactions(&conn).unwrap(),
            vec![existing, report.fired[0].transaction.clone()]
        );
    }

    #[test]
    fn empty_registry_fires_nothing() {
        let conn = get_test_connection();

        let report = run_rollover(date!(2024 - 01 - 31), &conn).unwrap();

        assert!(report.fired.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }
}
