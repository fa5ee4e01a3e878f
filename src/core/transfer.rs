//! Transfer workflow - Submission, listing and approval of transfer requests.
//!
//! Approval is the only operation with a cross-entity side effect: approving a
//! department move rewrites the employee's department, approving a retirement sets the
//! employee's status to retired. The status transition and the employee update happen
//! in one database transaction, so either both are visible or neither is. Dropping the
//! transaction on an early `?` return rolls everything back.
//!
//! Concurrent approvals of the same transfer are resolved by a guarded update
//! (`... WHERE id = ? AND status = Pending`): only one caller sees a row affected, the
//! other fails with [`Error::InvalidState`] before touching the employee.

use crate::{
    core::{department, employee},
    entities::{
        Department, Employee, EmployeeStatus, Transfer, TransferStatus, TransferType,
        department as department_entity, employee as employee_entity, transfer,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument, warn};

/// Arguments for submitting a transfer request.
#[derive(Debug, Clone)]
pub struct NewTransfer {
    /// Employee the request is about; must exist
    pub employee_id: i64,
    /// Kind of request
    pub transfer_type: TransferType,
    /// Date the move takes effect
    pub transfer_date: NaiveDate,
    /// Department being left; must exist when given
    pub from_department_id: Option<i64>,
    /// Target department; required for department moves, must exist when given
    pub to_department_id: Option<i64>,
    /// Free-form justification
    pub reason: Option<String>,
}

/// Outcome an approver can record. Encoded as the matching [`TransferStatus`] code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Decision {
    /// Apply the transfer to the employee
    Approved,
    /// Close the transfer without effect
    Rejected,
}

impl TryFrom<i32> for Decision {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        match TransferStatus::try_from(code)? {
            TransferStatus::Approved => Ok(Self::Approved),
            TransferStatus::Rejected => Ok(Self::Rejected),
            other => Err(Error::invalid_argument(format!(
                "decision must be approved (2) or rejected (3), got {other:?}"
            ))),
        }
    }
}

impl From<Decision> for TransferStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => Self::Approved,
            Decision::Rejected => Self::Rejected,
        }
    }
}

impl From<Decision> for i32 {
    fn from(decision: Decision) -> Self {
        TransferStatus::from(decision).into()
    }
}

/// Optional filters for [`list_transfers`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferFilter {
    /// Only transfers of this employee
    pub employee_id: Option<i64>,
    /// Only transfers in this state
    pub status: Option<TransferStatus>,
}

/// A transfer together with the records it refers to.
///
/// Each related record is `None` when it has been deleted since the transfer was
/// submitted.
#[derive(Debug, Clone, Serialize)]
pub struct TransferDetails {
    /// The stored transfer
    #[serde(flatten)]
    pub transfer: transfer::Model,
    /// Employee named by `employee_id`
    pub employee: Option<employee_entity::Model>,
    /// Department named by `from_department_id`
    pub from_department: Option<department_entity::Model>,
    /// Department named by `to_department_id`
    pub to_department: Option<department_entity::Model>,
}

/// Submits a new transfer request in `Pending` state.
///
/// A department move must name a target department. The employee and every named
/// department must exist; the checks and the insert share one transaction so a
/// reference cannot disappear between validation and insert.
#[instrument(skip(db, request), fields(employee_id = request.employee_id, transfer_type = ?request.transfer_type))]
pub async fn submit_transfer(
    db: &DatabaseConnection,
    request: NewTransfer,
) -> Result<transfer::Model> {
    if request.transfer_type == TransferType::DepartmentMove && request.to_department_id.is_none()
    {
        return Err(Error::invalid_argument(
            "a department move requires a target department",
        ));
    }

    let txn = db.begin().await?;

    employee::require_employee(&txn, request.employee_id).await?;
    if let Some(from_id) = request.from_department_id {
        department::require_department(&txn, from_id).await?;
    }
    if let Some(to_id) = request.to_department_id {
        department::require_department(&txn, to_id).await?;
    }

    let transfer = transfer::ActiveModel {
        employee_id: Set(request.employee_id),
        transfer_type: Set(request.transfer_type),
        transfer_date: Set(request.transfer_date),
        from_department_id: Set(request.from_department_id),
        to_department_id: Set(request.to_department_id),
        reason: Set(employee::optional_text(request.reason)),
        status: Set(TransferStatus::Pending),
        approver_id: Set(None),
        approved_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = transfer.insert(&txn).await?;

    txn.commit().await?;
    info!(transfer_id = created.id, "Transfer submitted");
    Ok(created)
}

/// Retrieves a specific transfer by its id.
pub async fn get_transfer_by_id<C>(db: &C, transfer_id: i64) -> Result<Option<transfer::Model>>
where
    C: ConnectionTrait,
{
    Transfer::find_by_id(transfer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists transfers matching `filter`, newest first, with their employee and
/// departments attached.
pub async fn list_transfers(
    db: &DatabaseConnection,
    filter: TransferFilter,
) -> Result<Vec<TransferDetails>> {
    let mut query = Transfer::find();
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(transfer::Column::EmployeeId.eq(employee_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(transfer::Column::Status.eq(status));
    }

    let transfers = query
        .order_by_desc(transfer::Column::CreatedAt)
        .order_by_desc(transfer::Column::Id)
        .all(db)
        .await?;

    if transfers.is_empty() {
        return Ok(Vec::new());
    }

    let employee_ids: HashSet<i64> = transfers.iter().map(|t| t.employee_id).collect();
    let department_ids: HashSet<i64> = transfers
        .iter()
        .flat_map(|t| [t.from_department_id, t.to_department_id])
        .flatten()
        .collect();

    let employees: HashMap<i64, employee_entity::Model> = Employee::find()
        .filter(employee_entity::Column::Id.is_in(employee_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    let departments: HashMap<i64, department_entity::Model> = if department_ids.is_empty() {
        HashMap::new()
    } else {
        Department::find()
            .filter(department_entity::Column::Id.is_in(department_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect()
    };

    let lookup = |id: Option<i64>| id.and_then(|id| departments.get(&id).cloned());

    Ok(transfers
        .into_iter()
        .map(|transfer| TransferDetails {
            employee: employees.get(&transfer.employee_id).cloned(),
            from_department: lookup(transfer.from_department_id),
            to_department: lookup(transfer.to_department_id),
            transfer,
        })
        .collect())
}

/// Records `decision` on a pending transfer and, on approval, applies its effect to the
/// employee.
///
/// Fails with [`Error::NotFound`] for an unknown transfer, [`Error::InvalidState`] if
/// the transfer was already decided (including by a concurrent call), and rolls back
/// the status change if the employee or target department cannot be updated.
///
/// # Returns
/// The transfer in its terminal state.
#[instrument(skip(db))]
pub async fn approve_transfer(
    db: &DatabaseConnection,
    transfer_id: i64,
    decision: Decision,
    approver_id: i64,
) -> Result<transfer::Model> {
    let txn = db.begin().await?;

    let current = get_transfer_by_id(&txn, transfer_id)
        .await?
        .ok_or_else(|| Error::not_found("Transfer", transfer_id))?;
    if current.status.is_decided() {
        return Err(already_decided(transfer_id, current.status));
    }

    let decided = record_decision(&txn, current, decision, approver_id).await?;

    txn.commit().await?;
    info!(status = ?decided.status, approver_id, "Transfer decided");
    Ok(decided)
}

/// Moves `current` out of `Pending` with a guarded update and applies an approval to
/// the employee, all inside `txn`.
///
/// `current` may be stale: if the stored row is no longer pending, nothing is written
/// and [`Error::InvalidState`] is returned.
async fn record_decision(
    txn: &DatabaseTransaction,
    current: transfer::Model,
    decision: Decision,
    approver_id: i64,
) -> Result<transfer::Model> {
    let status = TransferStatus::from(decision);
    let now = Utc::now();
    let updated = Transfer::update_many()
        .col_expr(transfer::Column::Status, Expr::value(status))
        .col_expr(transfer::Column::ApproverId, Expr::value(approver_id))
        .col_expr(transfer::Column::ApprovedAt, Expr::value(now))
        .filter(transfer::Column::Id.eq(current.id))
        .filter(transfer::Column::Status.eq(TransferStatus::Pending))
        .exec(txn)
        .await?;
    if updated.rows_affected == 0 {
        warn!(transfer_id = current.id, "Transfer was decided concurrently");
        return Err(Error::invalid_state(format!(
            "transfer {} has already been decided",
            current.id
        )));
    }

    if decision == Decision::Approved {
        apply_to_employee(txn, &current).await?;
    }

    Ok(transfer::Model {
        status,
        approver_id: Some(approver_id),
        approved_at: Some(now),
        ..current
    })
}

/// Updates the employee referenced by an approved transfer inside `txn`.
async fn apply_to_employee(txn: &DatabaseTransaction, transfer: &transfer::Model) -> Result<()> {
    let employee = employee::require_employee(txn, transfer.employee_id).await?;
    let mut active: employee_entity::ActiveModel = employee.into();

    match transfer.transfer_type {
        TransferType::DepartmentMove => {
            let target_id = transfer.to_department_id.ok_or_else(|| {
                Error::invalid_state(format!(
                    "department move {} has no target department",
                    transfer.id
                ))
            })?;
            let target = department::require_department(txn, target_id).await?;
            active.department = Set(target.name);
        }
        TransferType::Retirement => {
            active.status = Set(EmployeeStatus::Retired);
        }
        // Position is not tracked as a structured field
        TransferType::PositionMove => return Ok(()),
    }

    active.updated_at = Set(Utc::now());
    active.update(txn).await?;
    Ok(())
}

fn already_decided(transfer_id: i64, status: TransferStatus) -> Error {
    Error::invalid_state(format!(
        "transfer {transfer_id} has already been decided ({status:?})"
    ))
}
