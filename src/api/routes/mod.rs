//! Route handlers organized by resource.

/// Registration, login, profile
pub mod auth;
/// CSV export
pub mod backup;
/// Department CRUD
pub mod department;
/// Employee CRUD and listing
pub mod employee;
/// Transfer workflow
pub mod transfer;
