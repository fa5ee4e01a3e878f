//! Backup export of the employee table as CSV.
//!
//! The output starts with a UTF-8 byte order mark so spreadsheet applications detect
//! the encoding of non-ASCII names correctly.

use crate::{core::employee, entities::employee::Model as EmployeeModel, errors::Result};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::fmt::Write;

const BOM: &str = "\u{feff}";

const HEADER: [&str; 9] = [
    "ID",
    "Employee No",
    "Name",
    "Status",
    "Department",
    "Position",
    "Arrival Date",
    "Phone",
    "Email",
];

/// Renders every employee as CSV, one row per employee ordered by id.
pub async fn export_employees_csv(db: &DatabaseConnection) -> Result<String> {
    let employees = employee::list_all_employees(db).await?;
    tracing::info!(rows = employees.len(), "Exporting employees");
    Ok(render_csv(&employees))
}

/// File name offered to the client for an export taken at `now`.
#[must_use]
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("employees_backup_{}.csv", now.format("%Y%m%d%H%M%S"))
}

fn render_csv(employees: &[EmployeeModel]) -> String {
    let mut out = String::from(BOM);
    push_row(&mut out, HEADER.iter().copied());

    for emp in employees {
        let id = emp.id.to_string();
        let arrival = emp.arrival_date.to_string();
        push_row(
            &mut out,
            [
                id.as_str(),
                emp.employee_no.as_str(),
                emp.name.as_str(),
                emp.status.label(),
                emp.department.as_str(),
                emp.position.as_deref().unwrap_or_default(),
                arrival.as_str(),
                emp.phone.as_deref().unwrap_or_default(),
                emp.email.as_deref().unwrap_or_default(),
            ],
        );
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        // Writing to a String cannot fail
        let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
    } else {
        out.push_str(field);
    }
}
