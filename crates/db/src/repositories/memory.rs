//! In-memory repositories for tests and ephemeral tooling.

use std::collections::HashMap;
use std::sync::Mutex;

use orgflow_core::domain::department::Department;
use orgflow_core::domain::employee::{Employee, EmployeeId};
use orgflow_core::domain::enterprise::{Enterprise, EnterpriseId};
use orgflow_core::domain::position::Position;
use orgflow_core::domain::process::{ApprovalFlowStep, ApprovalProcess, ProcessId};

use super::{OrganizationRepository, ProcessRepository, RepositoryError};

#[derive(Default)]
struct OrgState {
    enterprises: HashMap<String, Enterprise>,
    departments: HashMap<String, Department>,
    positions: HashMap<String, Position>,
    employees: HashMap<String, Employee>,
}

#[derive(Default)]
pub struct InMemoryOrganizationRepository {
    state: Mutex<OrgState>,
}

impl InMemoryOrganizationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn find_employee(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let state = self.state.lock().expect("org state lock");
        Ok(state.employees.get(&id.0).cloned())
    }

    async fn list_departments(
        &self,
        enterprise_id: &EnterpriseId,
    ) -> Result<Vec<Department>, RepositoryError> {
        let state = self.state.lock().expect("org state lock");
        Ok(state
            .departments
            .values()
            .filter(|d| &d.enterprise_id == enterprise_id)
            .cloned()
            .collect())
    }

    async fn list_positions(
        &self,
        enterprise_id: &EnterpriseId,
    ) -> Result<Vec<Position>, RepositoryError> {
        let state = self.state.lock().expect("org state lock");
        Ok(state
            .positions
            .values()
            .filter(|p| match &p.enterprise_id {
                Some(owner) => owner == enterprise_id,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn list_active_employees(
        &self,
        enterprise_id: &EnterpriseId,
    ) -> Result<Vec<Employee>, RepositoryError> {
        let state = self.state.lock().expect("org state lock");
        Ok(state
            .employees
            .values()
            .filter(|e| &e.enterprise_id == enterprise_id && e.is_active())
            .cloned()
            .collect())
    }

    async fn save_enterprise(&self, enterprise: Enterprise) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("org state lock");
        state.enterprises.insert(enterprise.id.0.clone(), enterprise);
        Ok(())
    }

    async fn save_department(&self, department: Department) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("org state lock");
        state.departments.insert(department.id.0.clone(), department);
        Ok(())
    }

    async fn save_position(&self, position: Position) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("org state lock");
        state.positions.insert(position.id.0.clone(), position);
        Ok(())
    }

    async fn save_employee(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("org state lock");
        state.employees.insert(employee.id.0.clone(), employee);
        Ok(())
    }
}

#[derive(Default)]
struct ProcessState {
    processes: HashMap<String, ApprovalProcess>,
    steps: HashMap<String, ApprovalFlowStep>,
}

#[derive(Default)]
pub struct InMemoryProcessRepository {
    state: Mutex<ProcessState>,
}

impl InMemoryProcessRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProcessRepository for InMemoryProcessRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<ApprovalProcess>, RepositoryError> {
        let wanted = code.trim().to_ascii_lowercase();
        let state = self.state.lock().expect("process state lock");
        Ok(state
            .processes
            .values()
            .find(|p| p.code.trim().to_ascii_lowercase() == wanted)
            .cloned())
    }

    async fn list_processes(&self) -> Result<Vec<ApprovalProcess>, RepositoryError> {
        let state = self.state.lock().expect("process state lock");
        let mut processes: Vec<ApprovalProcess> = state.processes.values().cloned().collect();
        processes.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(processes)
    }

    async fn list_steps(
        &self,
        process_id: &ProcessId,
    ) -> Result<Vec<ApprovalFlowStep>, RepositoryError> {
        let state = self.state.lock().expect("process state lock");
        let mut steps: Vec<ApprovalFlowStep> =
            state.steps.values().filter(|s| &s.process_id == process_id).cloned().collect();
        steps.sort_by(|a, b| a.step_order.cmp(&b.step_order).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(steps)
    }

    async fn save_process(&self, process: ApprovalProcess) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("process state lock");
        state.processes.insert(process.id.0.clone(), process);
        Ok(())
    }

    async fn save_step(&self, step: ApprovalFlowStep) -> Result<(), RepositoryError> {
        step.validate()?;
        let mut state = self.state.lock().expect("process state lock");
        state.steps.insert(step.id.0.clone(), step);
        Ok(())
    }
}
