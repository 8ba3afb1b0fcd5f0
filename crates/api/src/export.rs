//! CSV rendering of report tables.

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use lendbook_core::report::ReportTable;
use lendbook_shared::AppError;
use tracing::info;

use crate::response::ApiError;

/// Renders `table` as CSV bytes, header row first.
pub fn render_csv(table: &ReportTable) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

/// Attachment response carrying `table` as `filename`.
pub fn csv_attachment(filename: &str, table: &ReportTable) -> Result<Response, ApiError> {
    let body = render_csv(table).map_err(|e| AppError::Internal(format!("CSV export failed: {e}")))?;
    info!(filename, rows = table.len(), bytes = body.len(), "Report exported");
    let headers = [
        (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, body).into_response())
}
