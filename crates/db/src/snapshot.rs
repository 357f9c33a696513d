//! Builds the in-memory routing snapshot one evaluation works against.
//!
//! All reads happen inside a single transaction so a concurrent
//! administrative write cannot produce a snapshot that mixes old and new
//! master data.

use tracing::debug;

use orgflow_core::domain::department::Department;
use orgflow_core::domain::employee::Employee;
use orgflow_core::domain::enterprise::EnterpriseId;
use orgflow_core::domain::position::Position;
use orgflow_core::domain::process::{ApprovalFlowStep, ApprovalProcess};
use orgflow_core::routing::catalog::ProcessCatalog;
use orgflow_core::routing::directory::OrgDirectory;
use orgflow_core::routing::RoutingEngine;

use crate::repositories::{organization, process, RepositoryError};
use crate::DbPool;

/// Everything the routing engine needs for one enterprise, loaded at a
/// single point in time.
pub struct RoutingSnapshot {
    pub directory: OrgDirectory,
    pub catalog: ProcessCatalog,
}

impl RoutingSnapshot {
    pub fn into_engine(self) -> RoutingEngine {
        RoutingEngine::new(self.directory, self.catalog)
    }
}

pub async fn load_routing_snapshot(
    pool: &DbPool,
    enterprise_id: &EnterpriseId,
) -> Result<RoutingSnapshot, RepositoryError> {
    let mut tx = pool.begin().await?;

    let departments: Vec<Department> = sqlx::query(
        "SELECT id, enterprise_id, name, parent_id
         FROM department WHERE enterprise_id = ?",
    )
    .bind(&enterprise_id.0)
    .fetch_all(&mut *tx)
    .await?
    .iter()
    .map(organization::row_to_department)
    .collect::<Result<_, _>>()?;

    let positions: Vec<Position> = sqlx::query(
        "SELECT id, enterprise_id, name, hierarchy_level, default_scope
         FROM position WHERE enterprise_id IS NULL OR enterprise_id = ?",
    )
    .bind(&enterprise_id.0)
    .fetch_all(&mut *tx)
    .await?
    .iter()
    .map(organization::row_to_position)
    .collect::<Result<_, _>>()?;

    let employees: Vec<Employee> = sqlx::query(
        "SELECT id, enterprise_id, department_id, position_id, full_name, status,
                created_at, updated_at
         FROM employee WHERE enterprise_id = ?",
    )
    .bind(&enterprise_id.0)
    .fetch_all(&mut *tx)
    .await?
    .iter()
    .map(organization::row_to_employee)
    .collect::<Result<_, _>>()?;

    let processes: Vec<ApprovalProcess> = sqlx::query(
        "SELECT id, code, name, module, is_active, requires_approval, created_at, updated_at
         FROM approval_process",
    )
    .fetch_all(&mut *tx)
    .await?
    .iter()
    .map(process::row_to_process)
    .collect::<Result<_, _>>()?;

    let steps: Vec<ApprovalFlowStep> = sqlx::query(
        "SELECT id, approval_process_id, enterprise_id, min_hierarchy_level, position_id,
                approval_scope, step_order, is_active, can_approve, can_reject
         FROM approval_flow_step",
    )
    .fetch_all(&mut *tx)
    .await?
    .iter()
    .map(process::row_to_step)
    .collect::<Result<_, _>>()?;

    tx.commit().await?;

    debug!(
        enterprise = %enterprise_id.0,
        departments = departments.len(),
        positions = positions.len(),
        employees = employees.len(),
        processes = processes.len(),
        steps = steps.len(),
        "loaded routing snapshot"
    );

    Ok(RoutingSnapshot {
        directory: OrgDirectory::new(departments, positions, employees),
        catalog: ProcessCatalog::new(processes, steps),
    })
}
