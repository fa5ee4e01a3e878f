//! Department management endpoints.

use crate::{
    api::{
        AppState,
        extract::{ApiJson, ApiPath},
        response::{ApiResponse, Deleted},
    },
    core::department::{self, DepartmentArgs},
    entities::DepartmentModel,
    errors::Result,
};
use axum::{Json, extract::State};
use serde::Deserialize;

/// Body of department create and update.
#[derive(Debug, Deserialize)]
pub struct DepartmentRequest {
    /// Unique department code
    pub dept_no: String,
    /// Display name
    pub name: String,
    /// `0` is treated as no manager
    #[serde(default)]
    pub manager_id: Option<i64>,
}

impl From<DepartmentRequest> for DepartmentArgs {
    fn from(request: DepartmentRequest) -> Self {
        Self {
            dept_no: request.dept_no,
            name: request.name,
            manager_id: request.manager_id.filter(|id| *id != 0),
        }
    }
}

/// `GET /api/departments`
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DepartmentModel>>>> {
    let departments = department::list_departments(&state.db).await?;
    Ok(ApiResponse::success(departments))
}

/// `POST /api/departments`
pub async fn create_department(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DepartmentRequest>,
) -> Result<Json<ApiResponse<DepartmentModel>>> {
    let created = department::create_department(&state.db, request.into()).await?;
    Ok(ApiResponse::success(created))
}

/// `PUT /api/departments/{id}`
pub async fn update_department(
    State(state): State<AppState>,
    ApiPath(department_id): ApiPath<i64>,
    ApiJson(request): ApiJson<DepartmentRequest>,
) -> Result<Json<ApiResponse<DepartmentModel>>> {
    let updated = department::update_department(&state.db, department_id, request.into()).await?;
    Ok(ApiResponse::success(updated))
}

/// `DELETE /api/departments/{id}`
pub async fn delete_department(
    State(state): State<AppState>,
    ApiPath(department_id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Deleted>>> {
    department::delete_department(&state.db, department_id).await?;
    Ok(ApiResponse::success(Deleted {
        message: "department deleted",
        id: department_id,
    }))
}
