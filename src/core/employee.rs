//! Employee business logic - Employee store used by the HTTP layer and the transfer
//! workflow.
//!
//! Lookups are generic over [`ConnectionTrait`] so the transfer workflow can run them
//! inside its own database transaction. CRUD operations validate their input and map
//! unique-key clashes to [`Error::Conflict`].

use crate::{
    entities::{Employee, EmployeeStatus, employee},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{Condition, PaginatorTrait, QueryOrder, QuerySelect, Set, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;
/// Page size used when the requested one is out of range.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Highest page number honoured; keeps the row offset within SQLite's signed 64-bit range.
pub const MAX_PAGE: u64 = i64::MAX.unsigned_abs() / MAX_PAGE_SIZE;

/// Requested page of a listing, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number, starting at 1
    pub page: u64,
    /// Rows per page
    pub page_size: u64,
}

impl Pagination {
    /// Clamps out-of-range values: pages start at 1 and stop at [`MAX_PAGE`], sizes
    /// outside `1..=100` become 10.
    #[must_use]
    pub const fn normalized(self) -> Self {
        let page = if self.page < 1 {
            1
        } else if self.page > MAX_PAGE {
            MAX_PAGE
        } else {
            self.page
        };
        let page_size = if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        };
        Self { page, page_size }
    }

    const fn offset(self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Rows matching the filter across all pages
    pub total: u64,
    /// Page number after normalization
    pub page: u64,
    /// Page size after normalization
    pub page_size: u64,
}

impl<T> Page<T> {
    /// Converts the items while keeping the paging information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Optional filters for [`list_employees`]. `name` and `department` match substrings.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Substring of the employee's name
    pub name: Option<String>,
    /// Exact status
    pub status: Option<EmployeeStatus>,
    /// Substring of the department name
    pub department: Option<String>,
}

/// Arguments for creating an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// Unique business key, must not be blank
    pub employee_no: String,
    /// Full name, must not be blank
    pub name: String,
    /// Initial employment status
    pub status: EmployeeStatus,
    /// Date the employee joined
    pub arrival_date: NaiveDate,
    /// Job title
    pub job_title: Option<String>,
    /// Position within the department
    pub position: Option<String>,
    /// Department name; blank is stored as empty
    pub department: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Free-form note
    pub remark: Option<String>,
}

/// Partial update of an employee. `None` and blank strings leave the field untouched.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    /// New full name
    pub name: Option<String>,
    /// New employment status
    pub status: Option<EmployeeStatus>,
    /// New job title
    pub job_title: Option<String>,
    /// New position
    pub position: Option<String>,
    /// New department name
    pub department: Option<String>,
    /// New contact phone
    pub phone: Option<String>,
    /// New contact email
    pub email: Option<String>,
    /// New postal address
    pub address: Option<String>,
    /// New note
    pub remark: Option<String>,
}

/// Finds an employee by id, returning None if it does not exist.
pub async fn get_employee_by_id<C>(db: &C, employee_id: i64) -> Result<Option<employee::Model>>
where
    C: ConnectionTrait,
{
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_employee_by_id`] but fails with [`Error::NotFound`] when absent.
pub async fn require_employee<C>(db: &C, employee_id: i64) -> Result<employee::Model>
where
    C: ConnectionTrait,
{
    get_employee_by_id(db, employee_id)
        .await?
        .ok_or_else(|| Error::not_found("Employee", employee_id))
}

/// Lists employees matching `filter`, newest first, one page at a time.
pub async fn list_employees(
    db: &DatabaseConnection,
    filter: &EmployeeFilter,
    pagination: Pagination,
) -> Result<Page<employee::Model>> {
    let pagination = pagination.normalized();

    let mut condition = Condition::all();
    if let Some(name) = non_blank(filter.name.as_deref()) {
        condition = condition.add(employee::Column::Name.contains(name));
    }
    if let Some(status) = filter.status {
        condition = condition.add(employee::Column::Status.eq(status));
    }
    if let Some(department) = non_blank(filter.department.as_deref()) {
        condition = condition.add(employee::Column::Department.contains(department));
    }

    let total = Employee::find().filter(condition.clone()).count(db).await?;

    let items = Employee::find()
        .filter(condition)
        .order_by_desc(employee::Column::CreatedAt)
        .order_by_desc(employee::Column::Id)
        .offset(pagination.offset())
        .limit(pagination.page_size)
        .all(db)
        .await?;

    Ok(Page {
        items,
        total,
        page: pagination.page,
        page_size: pagination.page_size,
    })
}

/// Every employee ordered by id; used by the backup export.
pub async fn list_all_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new employee after validating the required fields.
///
/// Fails with [`Error::Conflict`] if `employee_no` is already taken.
#[instrument(skip(db, new), fields(employee_no = %new.employee_no))]
pub async fn create_employee(
    db: &DatabaseConnection,
    new: NewEmployee,
) -> Result<employee::Model> {
    let employee_no = new.employee_no.trim().to_string();
    let name = new.name.trim().to_string();
    if employee_no.is_empty() {
        return Err(Error::invalid_argument("employee number cannot be empty"));
    }
    if name.is_empty() {
        return Err(Error::invalid_argument("employee name cannot be empty"));
    }

    let taken = Employee::find()
        .filter(employee::Column::EmployeeNo.eq(employee_no.as_str()))
        .count(db)
        .await?;
    if taken > 0 {
        return Err(Error::Conflict {
            message: format!("employee number {employee_no} already exists"),
        });
    }

    let now = Utc::now();
    let employee = employee::ActiveModel {
        employee_no: Set(employee_no),
        name: Set(name),
        status: Set(new.status),
        arrival_date: Set(new.arrival_date),
        job_title: Set(optional_text(new.job_title)),
        position: Set(optional_text(new.position)),
        department: Set(new.department.map(|d| d.trim().to_string()).unwrap_or_default()),
        phone: Set(optional_text(new.phone)),
        email: Set(optional_text(new.email)),
        address: Set(optional_text(new.address)),
        remark: Set(optional_text(new.remark)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = employee.insert(db).await?;
    info!(id = created.id, "Employee created");
    Ok(created)
}

/// Applies the provided, non-blank fields of `update` to an existing employee.
#[instrument(skip(db, update))]
pub async fn update_employee(
    db: &DatabaseConnection,
    employee_id: i64,
    update: EmployeeUpdate,
) -> Result<employee::Model> {
    let existing = require_employee(db, employee_id).await?;
    let mut active: employee::ActiveModel = existing.into();

    if let Some(name) = optional_text(update.name) {
        active.name = Set(name);
    }
    if let Some(status) = update.status {
        active.status = Set(status);
    }
    if let Some(department) = optional_text(update.department) {
        active.department = Set(department);
    }
    for (column, value) in [
        (employee::Column::JobTitle, update.job_title),
        (employee::Column::Position, update.position),
        (employee::Column::Phone, update.phone),
        (employee::Column::Email, update.email),
        (employee::Column::Address, update.address),
        (employee::Column::Remark, update.remark),
    ] {
        if let Some(value) = optional_text(value) {
            active.set(column, Some(value).into());
        }
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await.map_err(Into::into)
}

/// Deletes an employee. Transfers referring to it are kept.
#[instrument(skip(db))]
pub async fn delete_employee(db: &DatabaseConnection, employee_id: i64) -> Result<()> {
    let existing = require_employee(db, employee_id).await?;
    existing.delete(db).await?;
    info!("Employee deleted");
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Trims the value and turns blank strings into `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
