//! Department business logic - Department store.
//!
//! The transfer workflow only reads departments (to validate references and to copy the
//! target department's name onto the employee); everything else here backs the
//! department management endpoints and startup seeding.

use crate::{
    config::DepartmentSeed,
    entities::{Department, department},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Arguments for creating or replacing a department.
#[derive(Debug, Clone)]
pub struct DepartmentArgs {
    /// Unique department code, must not be blank
    pub dept_no: String,
    /// Display name, must not be blank
    pub name: String,
    /// Employee id of the manager
    pub manager_id: Option<i64>,
}

/// Finds a department by id, returning None if it does not exist.
pub async fn get_department_by_id<C>(
    db: &C,
    department_id: i64,
) -> Result<Option<department::Model>>
where
    C: ConnectionTrait,
{
    Department::find_by_id(department_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_department_by_id`] but fails with [`Error::NotFound`] when absent.
pub async fn require_department<C>(db: &C, department_id: i64) -> Result<department::Model>
where
    C: ConnectionTrait,
{
    get_department_by_id(db, department_id)
        .await?
        .ok_or_else(|| Error::not_found("Department", department_id))
}

/// Lists all departments ordered by their code.
pub async fn list_departments(db: &DatabaseConnection) -> Result<Vec<department::Model>> {
    Department::find()
        .order_by_asc(department::Column::DeptNo)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a department. `dept_no` must be unique.
#[instrument(skip(db, args), fields(dept_no = %args.dept_no))]
pub async fn create_department(
    db: &DatabaseConnection,
    args: DepartmentArgs,
) -> Result<department::Model> {
    let (dept_no, name) = validate(&args)?;
    ensure_dept_no_free(db, &dept_no, None).await?;

    let now = Utc::now();
    let department = department::ActiveModel {
        dept_no: Set(dept_no),
        name: Set(name),
        manager_id: Set(args.manager_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = department.insert(db).await?;
    info!(id = created.id, "Department created");
    Ok(created)
}

/// Replaces code, name and manager of an existing department.
///
/// Renaming does not touch employees: their department field is a snapshot taken when
/// a move was approved.
#[instrument(skip(db, args))]
pub async fn update_department(
    db: &DatabaseConnection,
    department_id: i64,
    args: DepartmentArgs,
) -> Result<department::Model> {
    let (dept_no, name) = validate(&args)?;
    let existing = require_department(db, department_id).await?;
    ensure_dept_no_free(db, &dept_no, Some(department_id)).await?;

    let mut active: department::ActiveModel = existing.into();
    active.dept_no = Set(dept_no);
    active.name = Set(name);
    active.manager_id = Set(args.manager_id);
    active.updated_at = Set(Utc::now());

    active.update(db).await.map_err(Into::into)
}

/// Deletes a department. Transfers pointing at it keep their id.
#[instrument(skip(db))]
pub async fn delete_department(db: &DatabaseConnection, department_id: i64) -> Result<()> {
    let existing = require_department(db, department_id).await?;
    existing.delete(db).await?;
    info!("Department deleted");
    Ok(())
}

/// Inserts the configured departments whose `dept_no` does not exist yet.
///
/// Returns the number of departments created. Safe to run on every startup.
pub async fn seed_departments(db: &DatabaseConnection, seeds: &[DepartmentSeed]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        let exists = Department::find()
            .filter(department::Column::DeptNo.eq(seed.dept_no.trim()))
            .count(db)
            .await?
            > 0;
        if exists {
            debug!(dept_no = %seed.dept_no, "Department already present, skipping seed");
            continue;
        }
        create_department(
            db,
            DepartmentArgs {
                dept_no: seed.dept_no.clone(),
                name: seed.name.clone(),
                manager_id: None,
            },
        )
        .await?;
        created += 1;
    }
    Ok(created)
}

fn validate(args: &DepartmentArgs) -> Result<(String, String)> {
    let dept_no = args.dept_no.trim().to_string();
    let name = args.name.trim().to_string();
    if dept_no.is_empty() {
        return Err(Error::invalid_argument("department number cannot be empty"));
    }
    if name.is_empty() {
        return Err(Error::invalid_argument("department name cannot be empty"));
    }
    Ok((dept_no, name))
}

async fn ensure_dept_no_free(
    db: &DatabaseConnection,
    dept_no: &str,
    except_id: Option<i64>,
) -> Result<()> {
    let mut query = Department::find().filter(department::Column::DeptNo.eq(dept_no));
    if let Some(id) = except_id {
        query = query.filter(department::Column::Id.ne(id));
    }
    if query.count(db).await? > 0 {
        return Err(Error::Conflict {
            message: format!("department number {dept_no} already exists"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_department_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_department(
            &db,
            DepartmentArgs {
                dept_no: "D1".to_string(),
                name: " ".to_string(),
                manager_id: None,
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
        assert!(list_departments(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_dept_no_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_department(&db, "D7", "Engineering").await?;
        let result = create_test_department(&db, "D7", "Research").await;
        assert!(matches!(result, Err(Error::Conflict { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_department() -> Result<()> {
        let db = setup_test_db().await?;
        let sales = create_test_department(&db, "D1", "Sales").await?;
        create_test_department(&db, "D7", "Engineering").await?;

        let renamed = update_department(
            &db,
            sales.id,
            DepartmentArgs {
                dept_no: "D1".to_string(),
                name: "Global Sales".to_string(),
                manager_id: Some(3),
            },
        )
        .await?;
        assert_eq!(renamed.name, "Global Sales");
        assert_eq!(renamed.manager_id, Some(3));

        // Taking another department's code is rejected
        let result = update_department(
            &db,
            sales.id,
            DepartmentArgs {
                dept_no: "D7".to_string(),
                name: "Global Sales".to_string(),
                manager_id: None,
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Conflict { .. })));

        let result = update_department(
            &db,
            999,
            DepartmentArgs {
                dept_no: "D9".to_string(),
                name: "Ghost".to_string(),
                manager_id: None,
            },
        )
        .await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_delete_departments() -> Result<()> {
        let db = setup_test_db().await?;
        let eng = create_test_department(&db, "D7", "Engineering").await?;
        create_test_department(&db, "D1", "Sales").await?;

        let names: Vec<String> = list_departments(&db)
            .await?
            .into_iter()
            .map(|d| d.dept_no)
            .collect();
        assert_eq!(names, vec!["D1", "D7"]);

        delete_department(&db, eng.id).await?;
        assert!(get_department_by_id(&db, eng.id).await?.is_none());
        assert!(matches!(
            delete_department(&db, eng.id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_departments_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = vec![
            DepartmentSeed {
                dept_no: "D1".to_string(),
                name: "Sales".to_string(),
            },
            DepartmentSeed {
                dept_no: "D7".to_string(),
                name: "Engineering".to_string(),
            },
        ];

        assert_eq!(seed_departments(&db, &seeds).await?, 2);
        assert_eq!(seed_departments(&db, &seeds).await?, 0);
        assert_eq!(list_departments(&db).await?.len(), 2);
        Ok(())
    }
}
