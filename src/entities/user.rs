//! User entity - Accounts that can log in and approve transfers.
//!
//! The role is stored for reference only; nothing in the backend restricts
//! operations by role.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role, stored and serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(try_from = "i32", into = "i32")]
pub enum UserRole {
    /// Regular account, assigned at registration
    #[default]
    #[sea_orm(num_value = 1)]
    Normal,
    /// Administrator
    #[sea_orm(num_value = 2)]
    Admin,
}

impl TryFrom<i32> for UserRole {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Normal),
            2 => Ok(Self::Admin),
            other => Err(Error::invalid_argument(format!("unknown role code {other}"))),
        }
    }
}

impl From<UserRole> for i32 {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Normal => 1,
            UserRole::Admin => 2,
        }
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2id PHC string; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Stored role; carried in tokens, never checked
    pub role: UserRole,
    /// Display name
    pub real_name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Time of the last successful login
    pub last_login: Option<DateTimeUtc>,
    /// When the account was registered
    pub created_at: DateTimeUtc,
    /// When the account was last modified
    pub updated_at: DateTimeUtc,
}

/// Users have no declared relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
