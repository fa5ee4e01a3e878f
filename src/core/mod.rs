//! Core business logic - framework-agnostic operations on employees, departments,
//! users and transfer requests. The HTTP layer in [`crate::api`] is a thin adapter
//! over these functions.

/// User registration, login and token handling
pub mod auth;
/// Department store
pub mod department;
/// Employee store, filtering and pagination
pub mod employee;
/// CSV backup export
pub mod export;
/// Transfer workflow: submit, list, approve
pub mod transfer;
