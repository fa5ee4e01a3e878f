//! Department entity - Organizational units employees can be moved between.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Department database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    /// Unique identifier for the department
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique department code (e.g. `"D7"`)
    #[sea_orm(unique)]
    pub dept_no: String,
    /// Display name, copied onto employees when a department move is approved
    pub name: String,
    /// Employee id of the manager; not enforced by the database
    pub manager_id: Option<i64>,
    /// When the department was created
    pub created_at: DateTimeUtc,
    /// When the department was last modified
    pub updated_at: DateTimeUtc,
}

/// Departments have no declared relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
