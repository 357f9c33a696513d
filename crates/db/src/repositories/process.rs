use chrono::{DateTime, Utc};
use sqlx::Row;

use orgflow_core::domain::enterprise::EnterpriseId;
use orgflow_core::domain::position::PositionId;
use orgflow_core::domain::process::{ApprovalFlowStep, ApprovalProcess, FlowStepId, ProcessId};
use orgflow_core::domain::scope::ApprovalScope;

use super::{ProcessRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProcessRepository {
    pool: DbPool,
}

impl SqlProcessRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode<T>(result: Result<T, sqlx::Error>) -> Result<T, RepositoryError> {
    result.map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)).unwrap_or_else(|_| Utc::now())
}

pub(crate) fn row_to_process(row: &sqlx::sqlite::SqliteRow) -> Result<ApprovalProcess, RepositoryError> {
    let id: String = decode(row.try_get("id"))?;
    let code: String = decode(row.try_get("code"))?;
    let name: String = decode(row.try_get("name"))?;
    let module: String = decode(row.try_get("module"))?;
    let is_active: i64 = decode(row.try_get("is_active"))?;
    let requires_approval: i64 = decode(row.try_get("requires_approval"))?;
    let created_at: String = decode(row.try_get("created_at"))?;
    let updated_at: String = decode(row.try_get("updated_at"))?;

    Ok(ApprovalProcess {
        id: ProcessId(id),
        code,
        name,
        module,
        is_active: is_active != 0,
        requires_approval: requires_approval != 0,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

pub(crate) fn row_to_step(row: &sqlx::sqlite::SqliteRow) -> Result<ApprovalFlowStep, RepositoryError> {
    let id: String = decode(row.try_get("id"))?;
    let process_id: String = decode(row.try_get("approval_process_id"))?;
    let enterprise_id: Option<String> = decode(row.try_get("enterprise_id"))?;
    let min_hierarchy_level: Option<i64> = decode(row.try_get("min_hierarchy_level"))?;
    let position_id: Option<String> = decode(row.try_get("position_id"))?;
    let approval_scope: Option<String> = decode(row.try_get("approval_scope"))?;
    let step_order: i64 = decode(row.try_get("step_order"))?;
    let is_active: i64 = decode(row.try_get("is_active"))?;
    let can_approve: i64 = decode(row.try_get("can_approve"))?;
    let can_reject: i64 = decode(row.try_get("can_reject"))?;

    Ok(ApprovalFlowStep {
        id: FlowStepId(id),
        process_id: ProcessId(process_id),
        enterprise_id: enterprise_id.map(EnterpriseId),
        min_hierarchy_level: min_hierarchy_level.map(|level| level as i32),
        position_id: position_id.map(PositionId),
        scope: approval_scope.and_then(|value| value.parse::<ApprovalScope>().ok()),
        step_order: step_order as i32,
        is_active: is_active != 0,
        can_approve: can_approve != 0,
        can_reject: can_reject != 0,
    })
}

#[async_trait::async_trait]
impl ProcessRepository for SqlProcessRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<ApprovalProcess>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, code, name, module, is_active, requires_approval, created_at, updated_at
             FROM approval_process WHERE LOWER(code) = LOWER(TRIM(?))",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_process(r)?)),
            None => Ok(None),
        }
    }

    async fn list_processes(&self) -> Result<Vec<ApprovalProcess>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, code, name, module, is_active, requires_approval, created_at, updated_at
             FROM approval_process ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_process).collect()
    }

    async fn list_steps(
        &self,
        process_id: &ProcessId,
    ) -> Result<Vec<ApprovalFlowStep>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, approval_process_id, enterprise_id, min_hierarchy_level, position_id,
                    approval_scope, step_order, is_active, can_approve, can_reject
             FROM approval_flow_step WHERE approval_process_id = ?
             ORDER BY step_order, id",
        )
        .bind(&process_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_step).collect()
    }

    async fn save_process(&self, process: ApprovalProcess) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO approval_process (id, code, name, module, is_active, requires_approval,
                                           created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 code = excluded.code,
                 name = excluded.name,
                 module = excluded.module,
                 is_active = excluded.is_active,
                 requires_approval = excluded.requires_approval,
                 updated_at = excluded.updated_at",
        )
        .bind(&process.id.0)
        .bind(&process.code)
        .bind(&process.name)
        .bind(&process.module)
        .bind(process.is_active as i64)
        .bind(process.requires_approval as i64)
        .bind(process.created_at.to_rfc3339())
        .bind(process.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_step(&self, step: ApprovalFlowStep) -> Result<(), RepositoryError> {
        step.validate()?;

        sqlx::query(
            "INSERT INTO approval_flow_step (id, approval_process_id, enterprise_id,
                                             min_hierarchy_level, position_id, approval_scope,
                                             step_order, is_active, can_approve, can_reject)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 approval_process_id = excluded.approval_process_id,
                 enterprise_id = excluded.enterprise_id,
                 min_hierarchy_level = excluded.min_hierarchy_level,
                 position_id = excluded.position_id,
                 approval_scope = excluded.approval_scope,
                 step_order = excluded.step_order,
                 is_active = excluded.is_active,
                 can_approve = excluded.can_approve,
                 can_reject = excluded.can_reject",
        )
        .bind(&step.id.0)
        .bind(&step.process_id.0)
        .bind(step.enterprise_id.as_ref().map(|id| id.0.clone()))
        .bind(step.min_hierarchy_level)
        .bind(step.position_id.as_ref().map(|id| id.0.clone()))
        .bind(step.scope.map(|scope| scope.as_str()))
        .bind(step.step_order)
        .bind(step.is_active as i64)
        .bind(step.can_approve as i64)
        .bind(step.can_reject as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
