use async_trait::async_trait;
use thiserror::Error;

use orgflow_core::domain::department::Department;
use orgflow_core::domain::employee::{Employee, EmployeeId};
use orgflow_core::domain::enterprise::{Enterprise, EnterpriseId};
use orgflow_core::domain::position::Position;
use orgflow_core::domain::process::{ApprovalFlowStep, ApprovalProcess, ProcessId};
use orgflow_core::errors::DomainError;

pub mod memory;
pub mod organization;
pub mod process;

pub use memory::{InMemoryOrganizationRepository, InMemoryProcessRepository};
pub use organization::SqlOrganizationRepository;
pub use process::SqlProcessRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Read/write access to the organizational master data. The routing engine
/// only reads; the `save_*` upserts serve the administrative layer and the
/// test fixtures.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_employee(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError>;

    async fn list_departments(
        &self,
        enterprise_id: &EnterpriseId,
    ) -> Result<Vec<Department>, RepositoryError>;

    /// Positions visible to the enterprise: its own plus global templates.
    async fn list_positions(
        &self,
        enterprise_id: &EnterpriseId,
    ) -> Result<Vec<Position>, RepositoryError>;

    async fn list_active_employees(
        &self,
        enterprise_id: &EnterpriseId,
    ) -> Result<Vec<Employee>, RepositoryError>;

    async fn save_enterprise(&self, enterprise: Enterprise) -> Result<(), RepositoryError>;
    async fn save_department(&self, department: Department) -> Result<(), RepositoryError>;
    async fn save_position(&self, position: Position) -> Result<(), RepositoryError>;
    async fn save_employee(&self, employee: Employee) -> Result<(), RepositoryError>;
}

/// Approval process definitions and their flow steps.
#[async_trait]
pub trait ProcessRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<ApprovalProcess>, RepositoryError>;

    async fn list_processes(&self) -> Result<Vec<ApprovalProcess>, RepositoryError>;

    async fn list_steps(
        &self,
        process_id: &ProcessId,
    ) -> Result<Vec<ApprovalFlowStep>, RepositoryError>;

    async fn save_process(&self, process: ApprovalProcess) -> Result<(), RepositoryError>;

    /// Persists a flow step, rejecting malformed selectors (none or both of
    /// threshold/position set). Evaluation tolerates bad rows; creation
    /// does not.
    async fn save_step(&self, step: ApprovalFlowStep) -> Result<(), RepositoryError>;
}
