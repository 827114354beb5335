//! Writes the ledger out as a spreadsheet or CSV file.
//!
//! Both formats have the columns description, amount, type and date, in that order.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

use crate::{Error, date_format::format_date, transaction::Transaction};

/// The message shown to users when an export fails.
///
/// The underlying error is only written to the logs.
pub const EXPORT_FAILED_MESSAGE: &str = "An error occurred while exporting to Excel.";

/// The name of the only worksheet in the exported workbook.
pub const WORKSHEET_NAME: &str = "Transactions";

/// The default file name for the exported workbook.
pub const XLSX_FILE_NAME: &str = "transactions.xlsx";

/// The default file name for the exported CSV file.
pub const CSV_FILE_NAME: &str = "transactions.csv";

/// The column headers, in order.
const HEADERS: [&str; 4] = ["description", "amount", "type", "date"];

/// The column widths in characters, in the same order as [HEADERS].
const COLUMN_WIDTHS: [f64; 4] = [30.0, 10.0, 15.0, 20.0];

/// The fill colour of the header row.
const HEADER_FILL: u32 = 0x4F81BD;

impl From<XlsxError> for Error {
    fn from(value: XlsxError) -> Self {
        Error::ExportError(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::ExportError(value.to_string())
    }
}

impl From<time::error::Format> for Error {
    fn from(value: time::error::Format) -> Self {
        Error::ExportError(value.to_string())
    }
}

/// Build the transactions workbook in memory and return the encoded `.xlsx` file.
///
/// # Errors
/// Returns an [Error::ExportError] if the workbook could not be encoded.
pub fn write_transactions_xlsx(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut workbook = build_workbook(transactions)?;

    Ok(workbook.save_to_buffer()?)
}

/// Write the transactions workbook to the file at `path`, replacing any existing file.
///
/// # Errors
/// Returns an [Error::ExportError] if the workbook could not be encoded or written.
pub fn save_transactions_xlsx(transactions: &[Transaction], path: &Path) -> Result<(), Error> {
    let mut workbook = build_workbook(transactions)?;
    workbook.save(path)?;

    tracing::info!(
        "Exported {} transactions to {}",
        transactions.len(),
        path.display()
    );

    Ok(())
}

fn build_workbook(transactions: &[Transaction]) -> Result<Workbook, Error> {
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center);
    let data_format = Format::new().set_align(FormatAlign::Center);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(WORKSHEET_NAME)?;

    for (col, (header, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, width)?;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
    }

    for (index, transaction) in transactions.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet.write_string_with_format(row, 0, &transaction.description, &data_format)?;
        worksheet.write_number_with_format(row, 1, transaction.amount, &data_format)?;
        worksheet.write_string_with_format(
            row,
            2,
            transaction.transaction_type.as_str(),
            &data_format,
        )?;
        worksheet.write_string_with_format(
            row,
            3,
            format_date(transaction.date)?,
            &data_format,
        )?;
    }

    Ok(workbook)
}

/// Encode the transactions as CSV with a header row.
///
/// # Errors
/// Returns an [Error::ExportError] if a record could not be written.
pub fn write_transactions_csv(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for transaction in transactions {
        let amount = transaction.amount.to_string();
        let date = format_date(transaction.date)?;

        writer.write_record([
            transaction.description.as_str(),
            amount.as_str(),
            transaction.transaction_type.as_str(),
            date.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))
}
