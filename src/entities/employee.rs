//! Employee entity - Represents a member of staff.
//!
//! Employees carry a unique business code (`employee_no`), an employment status and a
//! free-text department name. The department is stored denormalized: approving a
//! department move copies the target department's current name into this field.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employment status, stored and serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(try_from = "i32", into = "i32")]
pub enum EmployeeStatus {
    /// Regular, currently employed
    #[sea_orm(num_value = 1)]
    Active,
    /// Employed part-time
    #[sea_orm(num_value = 2)]
    PartTime,
    /// In the probation period
    #[sea_orm(num_value = 3)]
    Probation,
    /// Left the organization
    #[sea_orm(num_value = 4)]
    Resigned,
    /// Re-employed after retirement
    #[sea_orm(num_value = 5)]
    Rehired,
    /// Retired; set by an approved retirement transfer
    #[sea_orm(num_value = 6)]
    Retired,
}

impl EmployeeStatus {
    /// Human-readable label used in API responses and CSV exports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::PartTime => "Part-time",
            Self::Probation => "Probation",
            Self::Resigned => "Resigned",
            Self::Rehired => "Rehired",
            Self::Retired => "Retired",
        }
    }
}

impl TryFrom<i32> for EmployeeStatus {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Active),
            2 => Ok(Self::PartTime),
            3 => Ok(Self::Probation),
            4 => Ok(Self::Resigned),
            5 => Ok(Self::Rehired),
            6 => Ok(Self::Retired),
            other => Err(Error::invalid_argument(format!(
                "unknown employee status code {other}"
            ))),
        }
    }
}

impl From<EmployeeStatus> for i32 {
    fn from(status: EmployeeStatus) -> Self {
        match status {
            EmployeeStatus::Active => 1,
            EmployeeStatus::PartTime => 2,
            EmployeeStatus::Probation => 3,
            EmployeeStatus::Resigned => 4,
            EmployeeStatus::Rehired => 5,
            EmployeeStatus::Retired => 6,
        }
    }
}

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Surrogate key referenced by transfers
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique business code (e.g. `"E42"`)
    #[sea_orm(unique)]
    pub employee_no: String,
    /// Full name
    pub name: String,
    /// Employment status, stored as its integer code
    pub status: EmployeeStatus,
    /// Date the employee joined
    pub arrival_date: Date,
    /// Job title (e.g. "Engineer")
    pub job_title: Option<String>,
    /// Position within the department (e.g. "Team lead")
    pub position: Option<String>,
    /// Department name, not a foreign key; empty when unassigned
    pub department: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Postal address
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    /// Free-form note
    #[sea_orm(column_type = "Text", nullable)]
    pub remark: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified, including by an approved transfer
    pub updated_at: DateTimeUtc,
}

/// Employees are referenced by transfers and departments without database constraints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
