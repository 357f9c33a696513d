use chrono::{DateTime, Utc};
use sqlx::Row;

use orgflow_core::domain::department::{Department, DepartmentId};
use orgflow_core::domain::employee::{Employee, EmployeeId, EmployeeStatus};
use orgflow_core::domain::enterprise::{Enterprise, EnterpriseId};
use orgflow_core::domain::position::{Position, PositionId};
use orgflow_core::domain::scope::ApprovalScope;

use super::{OrganizationRepository, RepositoryError};
use crate::DbPool;

pub struct SqlOrganizationRepository {
    pool: DbPool,
}

impl SqlOrganizationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_status(raw: &str) -> EmployeeStatus {
    match raw {
        "active" => EmployeeStatus::Active,
        "terminated" => EmployeeStatus::Terminated,
        // Unknown values fail closed: the employee stays out of routing.
        _ => EmployeeStatus::Inactive,
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)).unwrap_or_else(|_| Utc::now())
}

fn parse_scope(raw: Option<String>) -> Option<ApprovalScope> {
    raw.and_then(|value| value.parse().ok())
}

fn decode<T>(result: Result<T, sqlx::Error>) -> Result<T, RepositoryError> {
    result.map_err(|e| RepositoryError::Decode(e.to_string()))
}

pub(crate) fn row_to_department(row: &sqlx::sqlite::SqliteRow) -> Result<Department, RepositoryError> {
    let id: String = decode(row.try_get("id"))?;
    let enterprise_id: String = decode(row.try_get("enterprise_id"))?;
    let name: String = decode(row.try_get("name"))?;
    let parent_id: Option<String> = decode(row.try_get("parent_id"))?;

    Ok(Department {
        id: DepartmentId(id),
        enterprise_id: EnterpriseId(enterprise_id),
        name,
        parent_id: parent_id.map(DepartmentId),
    })
}

pub(crate) fn row_to_position(row: &sqlx::sqlite::SqliteRow) -> Result<Position, RepositoryError> {
    let id: String = decode(row.try_get("id"))?;
    let enterprise_id: Option<String> = decode(row.try_get("enterprise_id"))?;
    let name: String = decode(row.try_get("name"))?;
    let hierarchy_level: i64 = decode(row.try_get("hierarchy_level"))?;
    let default_scope: Option<String> = decode(row.try_get("default_scope"))?;

    Ok(Position {
        id: PositionId(id),
        enterprise_id: enterprise_id.map(EnterpriseId),
        name,
        hierarchy_level: hierarchy_level as i32,
        default_scope: parse_scope(default_scope),
    })
}

pub(crate) fn row_to_employee(row: &sqlx::sqlite::SqliteRow) -> Result<Employee, RepositoryError> {
    let id: String = decode(row.try_get("id"))?;
    let enterprise_id: String = decode(row.try_get("enterprise_id"))?;
    let department_id: String = decode(row.try_get("department_id"))?;
    let position_id: Option<String> = decode(row.try_get("position_id"))?;
    let full_name: String = decode(row.try_get("full_name"))?;
    let status: String = decode(row.try_get("status"))?;
    let created_at: String = decode(row.try_get("created_at"))?;
    let updated_at: String = decode(row.try_get("updated_at"))?;

    Ok(Employee {
        id: EmployeeId(id),
        enterprise_id: EnterpriseId(enterprise_id),
        department_id: DepartmentId(department_id),
        position_id: position_id.map(PositionId),
        full_name,
        status: parse_status(&status),
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

#[async_trait::async_trait]
impl OrganizationRepository for SqlOrganizationRepository {
    async fn find_employee(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, enterprise_id, department_id, position_id, full_name, status,
                    created_at, updated_at
             FROM employee WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_employee(r)?)),
            None => Ok(None),
        }
    }

    async fn list_departments(
        &self,
        enterprise_id: &EnterpriseId,
    ) -> Result<Vec<Department>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, enterprise_id, name, parent_id
             FROM department WHERE enterprise_id = ?",
        )
        .bind(&enterprise_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_department).collect()
    }

    async fn list_positions(
        &self,
        enterprise_id: &EnterpriseId,
    ) -> Result<Vec<Position>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, enterprise_id, name, hierarchy_level, default_scope
             FROM position WHERE enterprise_id IS NULL OR enterprise_id = ?",
        )
        .bind(&enterprise_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_position).collect()
    }

    async fn list_active_employees(
        &self,
        enterprise_id: &EnterpriseId,
    ) -> Result<Vec<Employee>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, enterprise_id, department_id, position_id, full_name, status,
                    created_at, updated_at
             FROM employee WHERE enterprise_id = ? AND status = 'active'",
        )
        .bind(&enterprise_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_employee).collect()
    }

    async fn save_enterprise(&self, enterprise: Enterprise) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO enterprise (id, name, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 updated_at = excluded.updated_at",
        )
        .bind(&enterprise.id.0)
        .bind(&enterprise.name)
        .bind(enterprise.created_at.to_rfc3339())
        .bind(enterprise.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_department(&self, department: Department) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO department (id, enterprise_id, name, parent_id)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 enterprise_id = excluded.enterprise_id,
                 name = excluded.name,
                 parent_id = excluded.parent_id",
        )
        .bind(&department.id.0)
        .bind(&department.enterprise_id.0)
        .bind(&department.name)
        .bind(department.parent_id.as_ref().map(|id| id.0.clone()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_position(&self, position: Position) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO position (id, enterprise_id, name, hierarchy_level, default_scope)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 enterprise_id = excluded.enterprise_id,
                 name = excluded.name,
                 hierarchy_level = excluded.hierarchy_level,
                 default_scope = excluded.default_scope",
        )
        .bind(&position.id.0)
        .bind(position.enterprise_id.as_ref().map(|id| id.0.clone()))
        .bind(&position.name)
        .bind(position.hierarchy_level)
        .bind(position.default_scope.map(|scope| scope.as_str()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_employee(&self, employee: Employee) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO employee (id, enterprise_id, department_id, position_id, full_name,
                                   status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 enterprise_id = excluded.enterprise_id,
                 department_id = excluded.department_id,
                 position_id = excluded.position_id,
                 full_name = excluded.full_name,
                 status = excluded.status,
                 updated_at = excluded.updated_at",
        )
        .bind(&employee.id.0)
        .bind(&employee.enterprise_id.0)
        .bind(&employee.department_id.0)
        .bind(employee.position_id.as_ref().map(|id| id.0.clone()))
        .bind(&employee.full_name)
        .bind(employee.status.as_str())
        .bind(employee.created_at.to_rfc3339())
        .bind(employee.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use orgflow_core::domain::department::{Department, DepartmentId};
    use orgflow_core::domain::employee::{Employee, EmployeeId, EmployeeStatus};
    use orgflow_core::domain::enterprise::{Enterprise, EnterpriseId};
    use orgflow_core::domain::position::{Position, PositionId};
    use orgflow_core::domain::scope::ApprovalScope;

    use super::SqlOrganizationRepository;
    use crate::repositories::OrganizationRepository;
    use crate::{connect_with_settings, migrations};

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    async fn seed_org(repo: &SqlOrganizationRepository) {
        let now = Utc::now();
        repo.save_enterprise(Enterprise {
            id: EnterpriseId("e1".to_string()),
            name: "Agrosur".to_string(),
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("save enterprise");

        repo.save_department(Department {
            id: DepartmentId("dep-north".to_string()),
            enterprise_id: EnterpriseId("e1".to_string()),
            name: "North".to_string(),
            parent_id: None,
        })
        .await
        .expect("save department");

        repo.save_position(Position {
            id: PositionId("pos-mgr".to_string()),
            enterprise_id: Some(EnterpriseId("e1".to_string())),
            name: "Regional Manager".to_string(),
            hierarchy_level: 6,
            default_scope: Some(ApprovalScope::Enterprise),
        })
        .await
        .expect("save position");
    }

    fn sample_employee(id: &str, status: EmployeeStatus) -> Employee {
        let now = Utc::now();
        Employee {
            id: EmployeeId(id.to_string()),
            enterprise_id: EnterpriseId("e1".to_string()),
            department_id: DepartmentId("dep-north".to_string()),
            position_id: Some(PositionId("pos-mgr".to_string())),
            full_name: "Marta Iglesias".to_string(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn save_and_find_employee_round_trips() {
        let pool = setup().await;
        let repo = SqlOrganizationRepository::new(pool);
        seed_org(&repo).await;

        let employee = sample_employee("emp-1", EmployeeStatus::Active);
        repo.save_employee(employee.clone()).await.expect("save");

        let found = repo
            .find_employee(&EmployeeId("emp-1".to_string()))
            .await
            .expect("find")
            .expect("should exist");
        assert_eq!(found.id, employee.id);
        assert_eq!(found.position_id, employee.position_id);
        assert_eq!(found.status, EmployeeStatus::Active);
    }

    #[tokio::test]
    async fn active_listing_excludes_terminated_employees() {
        let pool = setup().await;
        let repo = SqlOrganizationRepository::new(pool);
        seed_org(&repo).await;

        repo.save_employee(sample_employee("emp-1", EmployeeStatus::Active)).await.expect("save 1");
        repo.save_employee(sample_employee("emp-2", EmployeeStatus::Terminated))
            .await
            .expect("save 2");
        repo.save_employee(sample_employee("emp-3", EmployeeStatus::Inactive))
            .await
            .expect("save 3");

        let active = repo
            .list_active_employees(&EnterpriseId("e1".to_string()))
            .await
            .expect("list active");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id.0, "emp-1");
    }

    #[tokio::test]
    async fn position_listing_includes_global_templates() {
        let pool = setup().await;
        let repo = SqlOrganizationRepository::new(pool);
        seed_org(&repo).await;

        repo.save_position(Position {
            id: PositionId("pos-global".to_string()),
            enterprise_id: None,
            name: "General Director".to_string(),
            hierarchy_level: 9,
            default_scope: None,
        })
        .await
        .expect("save global position");

        let positions =
            repo.list_positions(&EnterpriseId("e1".to_string())).await.expect("list positions");
        let mut ids: Vec<&str> = positions.iter().map(|p| p.id.0.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["pos-global", "pos-mgr"]);

        let other =
            repo.list_positions(&EnterpriseId("e2".to_string())).await.expect("list for e2");
        assert_eq!(other.len(), 1, "e2 only sees the global template");
    }

    #[tokio::test]
    async fn save_employee_upserts_on_conflict() {
        let pool = setup().await;
        let repo = SqlOrganizationRepository::new(pool);
        seed_org(&repo).await;

        repo.save_employee(sample_employee("emp-1", EmployeeStatus::Active)).await.expect("save");
        let mut updated = sample_employee("emp-1", EmployeeStatus::Inactive);
        updated.updated_at = Utc::now();
        repo.save_employee(updated).await.expect("upsert");

        let found = repo
            .find_employee(&EmployeeId("emp-1".to_string()))
            .await
            .expect("find")
            .expect("exists");
        assert_eq!(found.status, EmployeeStatus::Inactive);
    }
}
