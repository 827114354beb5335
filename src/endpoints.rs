//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/recurring/{recurring_id}', use [format_endpoint].

/// The route for the dashboard summary, which also rolls over due recurring costs.
pub const DASHBOARD: &str = "/api/dashboard";
/// The route to roll over due recurring costs without fetching the dashboard.
pub const ROLLOVER: &str = "/api/rollover";
/// The route to access transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to download the ledger as an Excel workbook.
pub const EXPORT_XLSX: &str = "/api/transactions/export";
/// The route to download the ledger as a CSV file.
pub const EXPORT_CSV: &str = "/api/transactions/export/csv";
/// The route to list the categories used in the ledger.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access recurring costs.
pub const RECURRING_COSTS: &str = "/api/recurring";
/// The route to access a single recurring cost.
pub const RECURRING_COST: &str = "/api/recurring/{recurring_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/transactions/{transaction_id}',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
