//! The ledger: every income and expense the user has recorded.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction API and ledger exports

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod export_endpoint;
mod list_endpoint;

pub use core::{
    RECURRING_CATEGORY, RowsAffected, Transaction, TransactionBuilder, TransactionType,
    create_transaction, create_transaction_table, get_transactions, validate_amount,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use export_endpoint::{export_csv_endpoint, export_xlsx_endpoint};
pub use list_endpoint::{
    get_categories_endpoint, get_transaction_endpoint, get_transactions_endpoint,
};

#[cfg(test)]
pub use core::count_transactions;
