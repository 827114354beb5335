use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use pocket_ledger::{
    EXPORT_FAILED_MESSAGE, get_transactions, initialize_db, save_transactions_xlsx,
};

/// Write the transactions in a pocket_ledger database to an Excel workbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// File path to save the workbook to. An existing file is replaced.
    #[arg(long, short, default_value = "transactions.xlsx")]
    output_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let db_path = Path::new(&args.db_path);
    if !db_path.is_file() {
        eprintln!("No database found at {db_path:#?}!");
        exit(1);
    }

    let conn = Connection::open(db_path)?;
    initialize_db(&conn)?;

    let transactions = get_transactions(&conn)?;
    let output_path = Path::new(&args.output_path);

    if let Err(error) = save_transactions_xlsx(&transactions, output_path) {
        eprintln!("{EXPORT_FAILED_MESSAGE}\n{error}");
        exit(1);
    }

    println!("File has been saved to: {}", output_path.display());

    Ok(())
}
