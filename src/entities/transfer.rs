//! Transfer entity - A request to move an employee between departments, change
//! their position, or retire them.
//!
//! A transfer starts `Pending` and is decided exactly once. `employee_id`,
//! `from_department_id` and `to_department_id` are plain ids validated by the
//! workflow in [`crate::core::transfer`]; no foreign key constraints are declared so
//! that historical transfers survive deletion of the rows they point at.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of transfer request, stored and serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(try_from = "i32", into = "i32")]
pub enum TransferType {
    /// Move to another department; requires a target department
    #[sea_orm(num_value = 1)]
    DepartmentMove,
    /// Change of position within the organization
    #[sea_orm(num_value = 2)]
    PositionMove,
    /// Retirement of the employee
    #[sea_orm(num_value = 3)]
    Retirement,
}

impl TryFrom<i32> for TransferType {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::DepartmentMove),
            2 => Ok(Self::PositionMove),
            3 => Ok(Self::Retirement),
            other => Err(Error::invalid_argument(format!(
                "unknown transfer type code {other}"
            ))),
        }
    }
}

impl From<TransferType> for i32 {
    fn from(transfer_type: TransferType) -> Self {
        match transfer_type {
            TransferType::DepartmentMove => 1,
            TransferType::PositionMove => 2,
            TransferType::Retirement => 3,
        }
    }
}

/// Lifecycle state of a transfer.
///
/// Only `Pending -> Approved` and `Pending -> Rejected` are ever performed.
/// `Completed` exists for wire compatibility and is never entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(try_from = "i32", into = "i32")]
pub enum TransferStatus {
    /// Awaiting a decision
    #[sea_orm(num_value = 1)]
    Pending,
    /// Approved and applied to the employee
    #[sea_orm(num_value = 2)]
    Approved,
    /// Rejected without effect
    #[sea_orm(num_value = 3)]
    Rejected,
    /// Reserved code, never entered
    #[sea_orm(num_value = 4)]
    Completed,
}

impl TransferStatus {
    /// Whether a decision has already been recorded.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl TryFrom<i32> for TransferStatus {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Pending),
            2 => Ok(Self::Approved),
            3 => Ok(Self::Rejected),
            4 => Ok(Self::Completed),
            other => Err(Error::invalid_argument(format!(
                "unknown transfer status code {other}"
            ))),
        }
    }
}

impl From<TransferStatus> for i32 {
    fn from(status: TransferStatus) -> Self {
        match status {
            TransferStatus::Pending => 1,
            TransferStatus::Approved => 2,
            TransferStatus::Rejected => 3,
            TransferStatus::Completed => 4,
        }
    }
}

/// Transfer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    /// Unique identifier for the transfer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee the request is about
    pub employee_id: i64,
    /// Kind of request; `type` on the wire
    #[serde(rename = "type")]
    pub transfer_type: TransferType,
    /// Date the move takes effect
    pub transfer_date: Date,
    /// Department the employee leaves, if recorded
    pub from_department_id: Option<i64>,
    /// Target department, always set for department moves
    pub to_department_id: Option<i64>,
    /// Free-form justification
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    /// Lifecycle state, stored as its integer code
    pub status: TransferStatus,
    /// User who decided the request; `None` while pending
    pub approver_id: Option<i64>,
    /// When the decision was recorded; `None` while pending
    pub approved_at: Option<DateTimeUtc>,
    /// Submission time; listings are ordered by it, newest first
    pub created_at: DateTimeUtc,
}

/// Transfers have no declared relations so they outlive the rows they name
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
