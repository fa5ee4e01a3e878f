//! Employee management endpoints.

use crate::{
    api::{
        AppState,
        extract::{ApiJson, ApiPath, ApiQuery},
        response::{ApiResponse, Deleted},
    },
    core::employee::{self, EmployeeFilter, EmployeeUpdate, NewEmployee, Page, Pagination},
    entities::{EmployeeModel, EmployeeStatus},
    errors::Result,
};
use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee as returned by the API, with a readable status label.
#[derive(Debug, Serialize)]
pub struct EmployeeView {
    /// Stored employee fields
    #[serde(flatten)]
    pub employee: EmployeeModel,
    /// Label of `status`, e.g. "Probation"
    pub status_text: &'static str,
}

impl From<EmployeeModel> for EmployeeView {
    fn from(employee: EmployeeModel) -> Self {
        let status_text = employee.status.label();
        Self {
            employee,
            status_text,
        }
    }
}

/// Filters and paging of `GET /api/employees`.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    /// 1-based page, defaults to 1
    pub page: Option<u64>,
    /// Rows per page, defaults to 10
    pub page_size: Option<u64>,
    /// Name substring
    pub name: Option<String>,
    /// Unknown status codes are ignored rather than rejected
    pub status: Option<i32>,
    /// Department substring
    pub department: Option<String>,
}

/// Body of `POST /api/employees`.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Unique business code; `employee_id` is accepted too
    #[serde(alias = "employee_id")]
    pub employee_no: String,
    /// Full name
    pub name: String,
    /// Status code 1-6
    pub status: i32,
    /// Date the employee joined, `YYYY-MM-DD`
    pub arrival_date: NaiveDate,
    /// Job title
    pub job_title: Option<String>,
    /// Position within the department
    pub position: Option<String>,
    /// Department name
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

/// Body of `PUT /api/employees/{id}`; absent or blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    /// New full name
    pub name: Option<String>,
    /// New status code 1-6; unknown codes are rejected
    pub status: Option<i32>,
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

/// `GET /api/employees`
pub async fn list_employees(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmployeeQuery>,
) -> Result<Json<ApiResponse<Page<EmployeeView>>>> {
    let filter = EmployeeFilter {
        name: query.name,
        status: query.status.and_then(|code| EmployeeStatus::try_from(code).ok()),
        department: query.department,
    };
    let pagination = Pagination {
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(employee::DEFAULT_PAGE_SIZE),
    };

    let page = employee::list_employees(&state.db, &filter, pagination).await?;
    Ok(ApiResponse::success(page.map(EmployeeView::from)))
}

/// `GET /api/employees/{id}`
pub async fn get_employee(
    State(state): State<AppState>,
    ApiPath(employee_id): ApiPath<i64>,
) -> Result<Json<ApiResponse<EmployeeView>>> {
    let found = employee::require_employee(&state.db, employee_id).await?;
    Ok(ApiResponse::success(found.into()))
}

/// `POST /api/employees`
pub async fn create_employee(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeView>>> {
    let new = NewEmployee {
        employee_no: request.employee_no,
        name: request.name,
        status: EmployeeStatus::try_from(request.status)?,
        arrival_date: request.arrival_date,
        job_title: request.job_title,
        position: request.position,
        department: request.department,
        phone: request.phone,
        email: request.email,
        address: request.address,
        remark: request.remark,
    };
    let created = employee::create_employee(&state.db, new).await?;
    Ok(ApiResponse::success(created.into()))
}

/// `PUT /api/employees/{id}`
pub async fn update_employee(
    State(state): State<AppState>,
    ApiPath(employee_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeView>>> {
    let update = EmployeeUpdate {
        name: request.name,
        status: request.status.map(EmployeeStatus::try_from).transpose()?,
        job_title: request.job_title,
        position: request.position,
        department: request.department,
        phone: request.phone,
        email: request.email,
        address: request.address,
        remark: request.remark,
    };
    let updated = employee::update_employee(&state.db, employee_id, update).await?;
    Ok(ApiResponse::success(updated.into()))
}

/// `DELETE /api/employees/{id}`
pub async fn delete_employee(
    State(state): State<AppState>,
    ApiPath(employee_id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Deleted>>> {
    employee::delete_employee(&state.db, employee_id).await?;
    Ok(ApiResponse::success(Deleted {
        message: "employee deleted",
        id: employee_id,
    }))
}
