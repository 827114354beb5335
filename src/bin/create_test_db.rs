use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use pocket_ledger::{
    Period, RecurringCost, Transaction, TransactionType, create_recurring_cost,
    create_transaction, initialize_db,
};

/// A utility for creating a test database for the REST API server of pocket_ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let today = OffsetDateTime::now_utc().date();

    println!("Creating test transactions...");
    let sample_transactions = [
        (2500.0, 14, "Salary", TransactionType::Income, "Work"),
        (82.4, 12, "Groceries", TransactionType::Expense, "Food"),
        (12.5, 9, "Movie tickets", TransactionType::Expense, "Entertainment"),
        (60.0, 6, "Power bill", TransactionType::Expense, "Utilities"),
        (150.0, 4, "Sold bike", TransactionType::Income, "Other"),
        (45.2, 2, "Groceries", TransactionType::Expense, "Food"),
        (3.8, 1, "Bus fare", TransactionType::Expense, "Transport"),
    ];

    for (amount, days_ago, description, transaction_type, category) in sample_transactions {
        create_transaction(
            Transaction::build(amount, today - Duration::days(days_ago), description)
                .transaction_type(transaction_type)
                .category(category),
            &conn,
        )?;
    }

    println!("Creating test recurring costs...");
    let tomorrow = today.next_day().unwrap_or(Date::MAX);
    create_recurring_cost(
        RecurringCost::build("Coffee", 4.5, Period::Daily, today),
        &conn,
    )?;
    create_recurring_cost(
        RecurringCost::build("Rent", 450.0, Period::Monthly, tomorrow),
        &conn,
    )?;
    create_recurring_cost(
        RecurringCost::build("Car insurance", 600.0, Period::Yearly, today),
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
