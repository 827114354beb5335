//! Transaction data aggregation for the dashboard.
//!
//! Provides functions to total the ledger by transaction type, weekday and
//! category. All of them are recomputed from the ledger on every request and
//! an empty ledger gives zero totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionType};

/// The weekday labels, starting on Sunday.
pub const DAYS_OF_WEEK: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Income and expense totals for each day of the week.
///
/// Index 0 of each array is Sunday, matching [DAYS_OF_WEEK].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTotals {
    /// The weekday names, Sunday first.
    pub labels: [String; 7],
    /// Total income per weekday.
    pub income: [f64; 7],
    /// Total expenses per weekday.
    pub expense: [f64; 7],
}

/// The total of all transactions with a given category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category label.
    pub name: String,
    /// The sum of income and expense amounts in the category.
    pub total: f64,
}

/// Sums the amounts of every transaction of `transaction_type`.
pub fn sum_by_type(transactions: &[Transaction], transaction_type: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == transaction_type)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Total income minus total expenses.
pub fn balance(transactions: &[Transaction]) -> f64 {
    sum_by_type(transactions, TransactionType::Income)
        - sum_by_type(transactions, TransactionType::Expense)
}

/// Sums income and expenses separately for each weekday.
pub fn sum_by_day_of_week(transactions: &[Transaction]) -> WeeklyTotals {
    let mut income = [0.0; 7];
    let mut expense = [0.0; 7];

    for transaction in transactions {
        let day = transaction.date.weekday().number_days_from_sunday() as usize;

        match transaction.transaction_type {
            TransactionType::Income => income[day] += transaction.amount,
            TransactionType::Expense => expense[day] += transaction.amount,
        }
    }

    WeeklyTotals {
        labels: DAYS_OF_WEEK.map(str::to_owned),
        income,
        expense,
    }
}

/// Sums transactions of both types for each category, sorted by category label.
pub fn sum_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for transaction in transactions {
        *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
    }

    totals
        .into_iter()
        .map(|(name, total)| CategoryTotal {
            name: name.to_owned(),
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::{
        dashboard::aggregation::{
            CategoryTotal, DAYS_OF_WEEK, balance, sum_by_category, sum_by_day_of_week,
            sum_by_type,
        },
        database_id::TransactionId,
        transaction::{Transaction, TransactionType},
    };

    fn create_test_transaction(
        amount: f64,
        transaction_type: TransactionType,
        date: Date,
        category: &str,
    ) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            description: format!("{category} on {date}"),
            amount,
            transaction_type,
            date,
            category: category.to_owned(),
        }
    }

    fn sample_ledger() -> Vec<Transaction> {
        vec![
            // Sunday
            create_test_transaction(1000.0, TransactionType::Income, date!(2024 - 03 - 03), "Work"),
            // Monday
            create_test_transaction(50.0, TransactionType::Expense, date!(2024 - 03 - 04), "Food"),
            // Monday
            create_test_transaction(25.5, TransactionType::Expense, date!(2024 - 03 - 11), "Food"),
            // Saturday
            create_test_transaction(450.0, TransactionType::Expense, date!(2024 - 03 - 09), "recurring"),
            // Saturday
            create_test_transaction(20.0, TransactionType::Income, date!(2024 - 03 - 09), "Food"),
        ]
    }

    #[test]
    fn sums_by_type() {
        let ledger = sample_ledger();

        assert_eq!(sum_by_type(&ledger, TransactionType::Income), 1020.0);
        assert_eq!(sum_by_type(&ledger, TransactionType::Expense), 525.5);
    }

    #[test]
    fn balance_is_income_minus_expenses() {
        let ledger = sample_ledger();

        assert_eq!(balance(&ledger), 494.5);
        assert_eq!(
            balance(&ledger),
            sum_by_type(&ledger, TransactionType::Income)
                - sum_by_type(&ledger, TransactionType::Expense)
        );
    }

    #[test]
    fn buckets_by_weekday_starting_sunday() {
        let weekly = sum_by_day_of_week(&sample_ledger());

        assert_eq!(weekly.labels, DAYS_OF_WEEK.map(str::to_owned));
        assert_eq!(weekly.income, [1000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 20.0]);
        assert_eq!(weekly.expense, [0.0, 75.5, 0.0, 0.0, 0.0, 0.0, 450.0]);
    }

    #[test]
    fn weekday_totals_add_up_to_type_totals() {
        let ledger = sample_ledger();
        let weekly = sum_by_day_of_week(&ledger);

        assert_eq!(
            weekly.income.iter().sum::<f64>(),
            sum_by_type(&ledger, TransactionType::Income)
        );
        assert_eq!(
            weekly.expense.iter().sum::<f64>(),
            sum_by_type(&ledger, TransactionType::Expense)
        );
    }

    #[test]
    fn sums_by_category_sorted_by_label() {
        let totals = sum_by_category(&sample_ledger());

        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    name: "Food".to_owned(),
                    total: 95.5
                },
                CategoryTotal {
                    name: "Work".to_owned(),
                    total: 1000.0
                },
                CategoryTotal {
                    name: "recurring".to_owned(),
                    total: 450.0
                },
            ]
        );
    }

    #[test]
    fn empty_ledger_gives_zero_totals() {
        let weekly = sum_by_day_of_week(&[]);

        assert_eq!(sum_by_type(&[], TransactionType::Income), 0.0);
        assert_eq!(sum_by_type(&[], TransactionType::Expense), 0.0);
        assert_eq!(balance(&[]), 0.0);
        assert_eq!(weekly.income, [0.0; 7]);
        assert_eq!(weekly.expense, [0.0; 7]);
        assert!(sum_by_category(&[]).is_empty());
    }
}
