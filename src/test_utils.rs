//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        department::{self, DepartmentArgs},
        employee::{self, NewEmployee},
    },
    entities::{self, EmployeeStatus},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Employee arguments with sensible defaults.
///
/// # Defaults
/// * `name`: "Test Employee"
/// * `status`: Active
/// * `arrival_date`: 2024-01-15
/// * all optional fields: None
pub fn new_employee(employee_no: &str, department: &str) -> NewEmployee {
    NewEmployee {
        employee_no: employee_no.to_string(),
        name: "Test Employee".to_string(),
        status: EmployeeStatus::Active,
        arrival_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default(),
        job_title: None,
        position: None,
        department: Some(department.to_string()),
        phone: None,
        email: None,
        address: None,
        remark: None,
    }
}

/// Creates a test employee with the defaults of [`new_employee`].
pub async fn create_test_employee(
    db: &DatabaseConnection,
    employee_no: &str,
    department: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(db, new_employee(employee_no, department)).await
}

/// Creates a test department without a manager.
pub async fn create_test_department(
    db: &DatabaseConnection,
    dept_no: &str,
    name: &str,
) -> Result<entities::department::Model> {
    department::create_department(
        db,
        DepartmentArgs {
            dept_no: dept_no.to_string(),
            name: name.to_string(),
            manager_id: None,
        },
    )
    .await
}

/// Sets up employee E42 in "Sales" and department D7 "Engineering".
/// Returns (db, employee, department) for transfer scenarios.
pub async fn setup_with_employee_and_department() -> Result<(
    DatabaseConnection,
    entities::employee::Model,
    entities::department::Model,
)> {
    let db = setup_test_db().await?;
    let employee = create_test_employee(&db, "E42", "Sales").await?;
    let department = create_test_department(&db, "D7", "Engineering").await?;
    Ok((db, employee, department))
}
