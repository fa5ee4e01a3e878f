//! Transfer endpoints: submit, list and decide transfer requests.

use crate::{
    api::{
        AppState,
        extract::{ApiJson, ApiPath, ApiQuery},
        response::ApiResponse,
    },
    core::transfer::{self, Decision, NewTransfer, TransferDetails, TransferFilter},
    entities::{TransferModel, TransferStatus, TransferType},
    errors::Result,
};
use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::Deserialize;

/// Body of `POST /api/transfers`.
#[derive(Debug, Deserialize)]
pub struct SubmitTransferRequest {
    /// Employee being transferred
    pub employee_id: i64,
    /// Transfer type code: 1 department move, 2 position move, 3 retirement
    #[serde(rename = "type")]
    pub transfer_type: i32,
    /// Effective date
    pub transfer_date: NaiveDate,
    /// `0` is treated as absent
    #[serde(default, alias = "from_dept_id")]
    pub from_department_id: Option<i64>,
    /// `0` is treated as absent
    #[serde(default, alias = "to_dept_id")]
    pub to_department_id: Option<i64>,
    /// Free-form justification
    #[serde(default)]
    pub reason: Option<String>,
}

/// Filters of `GET /api/transfers`.
#[derive(Debug, Default, Deserialize)]
pub struct TransferQuery {
    /// Only transfers of this employee
    pub employee_id: Option<i64>,
    /// Only transfers with this status code
    pub status: Option<i32>,
}

/// Body of `PUT /api/transfers/{id}/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveTransferRequest {
    /// Decision code: 2 approved, 3 rejected
    pub status: i32,
    /// User recording the decision
    pub approver_id: i64,
}

/// `POST /api/transfers`
pub async fn submit_transfer(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SubmitTransferRequest>,
) -> Result<Json<ApiResponse<TransferModel>>> {
    let new = NewTransfer {
        employee_id: request.employee_id,
        transfer_type: TransferType::try_from(request.transfer_type)?,
        transfer_date: request.transfer_date,
        from_department_id: request.from_department_id.filter(|id| *id != 0),
        to_department_id: request.to_department_id.filter(|id| *id != 0),
        reason: request.reason,
    };
    let created = transfer::submit_transfer(&state.db, new).await?;
    Ok(ApiResponse::success(created))
}

/// `GET /api/transfers?employee_id=&status=`
pub async fn list_transfers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TransferQuery>,
) -> Result<Json<ApiResponse<Vec<TransferDetails>>>> {
    let filter = TransferFilter {
        employee_id: query.employee_id,
        status: query.status.map(TransferStatus::try_from).transpose()?,
    };
    let transfers = transfer::list_transfers(&state.db, filter).await?;
    Ok(ApiResponse::success(transfers))
}

/// `PUT /api/transfers/{id}/approve`
pub async fn approve_transfer(
    State(state): State<AppState>,
    ApiPath(transfer_id): ApiPath<i64>,
    ApiJson(request): ApiJson<ApproveTransferRequest>,
) -> Result<Json<ApiResponse<TransferModel>>> {
    let decision = Decision::try_from(request.status)?;
    let decided =
        transfer::approve_transfer(&state.db, transfer_id, decision, request.approver_id).await?;
    Ok(ApiResponse::success(decided))
}
