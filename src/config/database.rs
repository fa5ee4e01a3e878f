//! Database configuration module.
//!
//! This module handles the `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust structs without hand-written SQL.
//! Creation is idempotent (`IF NOT EXISTS`) so the server can restart against an
//! existing database file.

use crate::entities::{Department, Employee, Transfer, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Default location of the database when neither the config file nor the
/// environment provides one. `mode=rwc` creates the file on first start.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://personnel.sqlite?mode=rwc";

/// Resolves the database URL.
///
/// `DATABASE_URL` in the environment wins over the configured value, which wins over
/// [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
///
/// The returned connection is owned by the caller (normally `main`) and handed to the
/// HTTP layer; nothing in the crate holds a global handle.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Opening database connection");
    let db = Database::connect(database_url).await?;
    info!("Database connection established");
    Ok(db)
}

/// Creates all tables from the entity definitions if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Employee).await?;
    create_table(db, &schema, Department).await?;
    create_table(db, &schema, Transfer).await?;
    create_table(db, &schema, User).await?;

    info!("Database tables ensured");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        department::Model as DepartmentModel, employee::Model as EmployeeModel,
        transfer::Model as TransferModel, user::Model as UserModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<EmployeeModel> = Employee::find().limit(1).all(&db).await?;
        let _: Vec<DepartmentModel> = Department::find().limit(1).all(&db).await?;
        let _: Vec<TransferModel> = Transfer::find().limit(1).all(&db).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_configured_url_used_when_env_absent() {
        // Only meaningful when DATABASE_URL is not exported in the test environment
        if std::env::var("DATABASE_URL").is_err() {
            assert_eq!(get_database_url(Some("sqlite::memory:")), "sqlite::memory:");
            assert_eq!(get_database_url(None), DEFAULT_DATABASE_URL);
        }
    }
}
