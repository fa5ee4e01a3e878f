//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables. References between them are plain
//! ids checked by the business layer rather than foreign key constraints.

/// Departments
pub mod department;
/// Employees and their status codes
pub mod employee;
/// Transfer requests, their types and statuses
pub mod transfer;
/// User accounts and roles
pub mod user;

// Re-export specific types to avoid conflicts
pub use department::{Column as DepartmentColumn, Entity as Department, Model as DepartmentModel};
pub use employee::{
    Column as EmployeeColumn, EmployeeStatus, Entity as Employee, Model as EmployeeModel,
};
pub use transfer::{
    Column as TransferColumn, Entity as Transfer, Model as TransferModel, TransferStatus,
    TransferType,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserRole};
