//! Backup download.

use crate::{api::AppState, core::export, errors::Result};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

/// `GET /api/backup/export` - employee table as a CSV attachment.
pub async fn export_employees(State(state): State<AppState>) -> Result<Response> {
    let csv = export::export_employees_csv(&state.db).await?;
    let disposition = format!(
        "attachment; filename={}",
        export::export_file_name(Utc::now())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
