use std::collections::HashMap;

use crate::domain::department::{Department, DepartmentId};
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::enterprise::EnterpriseId;
use crate::domain::position::{Position, PositionId};

/// Read-only snapshot of the organizational hierarchy for one evaluation.
///
/// Built once from already-fetched rows; the engine never mutates it and it
/// performs no I/O, so concurrent evaluations may share it freely. The
/// child-department index is precomputed because the `child_departments`
/// containment check is the only non-constant-cost operation in routing.
#[derive(Clone, Debug, Default)]
pub struct OrgDirectory {
    departments: HashMap<DepartmentId, Department>,
    positions: HashMap<PositionId, Position>,
    employees: HashMap<EmployeeId, Employee>,
    children: HashMap<DepartmentId, Vec<DepartmentId>>,
}

impl OrgDirectory {
    pub fn new(
        departments: Vec<Department>,
        positions: Vec<Position>,
        employees: Vec<Employee>,
    ) -> Self {
        let mut children: HashMap<DepartmentId, Vec<DepartmentId>> = HashMap::new();
        for department in &departments {
            if let Some(parent_id) = &department.parent_id {
                children.entry(parent_id.clone()).or_default().push(department.id.clone());
            }
        }

        let departments =
            departments.into_iter().map(|department| (department.id.clone(), department)).collect();
        let positions =
            positions.into_iter().map(|position| (position.id.clone(), position)).collect();
        let employees =
            employees.into_iter().map(|employee| (employee.id.clone(), employee)).collect();

        Self { departments, positions, employees, children }
    }

    pub fn department(&self, id: &DepartmentId) -> Option<&Department> {
        self.departments.get(id)
    }

    pub fn position(&self, id: &PositionId) -> Option<&Position> {
        self.positions.get(id)
    }

    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.get(id)
    }

    pub fn children_of(&self, id: &DepartmentId) -> &[DepartmentId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn department_count(&self) -> usize {
        self.departments.len()
    }

    /// Active employees belonging to one enterprise. Iteration order is
    /// unspecified; callers needing stable output sort afterwards.
    pub fn active_employees_in<'a>(
        &'a self,
        enterprise_id: &'a EnterpriseId,
    ) -> impl Iterator<Item = &'a Employee> {
        self.employees
            .values()
            .filter(move |employee| &employee.enterprise_id == enterprise_id)
            .filter(|employee| employee.is_active())
    }

    /// Positions an enterprise can staff: its own plus global templates.
    pub fn positions_visible_to<'a>(
        &'a self,
        enterprise_id: &'a EnterpriseId,
    ) -> impl Iterator<Item = &'a Position> {
        self.positions.values().filter(move |position| {
            position.enterprise_id.is_none()
                || position.enterprise_id.as_ref() == Some(enterprise_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::OrgDirectory;
    use crate::domain::department::{Department, DepartmentId};
    use crate::domain::employee::{Employee, EmployeeId, EmployeeStatus};
    use crate::domain::enterprise::EnterpriseId;
    use crate::domain::position::{Position, PositionId};

    fn department(id: &str, enterprise: &str, parent: Option<&str>) -> Department {
        Department {
            id: DepartmentId(id.to_string()),
            enterprise_id: EnterpriseId(enterprise.to_string()),
            name: id.to_string(),
            parent_id: parent.map(|p| DepartmentId(p.to_string())),
        }
    }

    fn employee(id: &str, enterprise: &str, status: EmployeeStatus) -> Employee {
        let now = Utc::now();
        Employee {
            id: EmployeeId(id.to_string()),
            enterprise_id: EnterpriseId(enterprise.to_string()),
            department_id: DepartmentId("dept-1".to_string()),
            position_id: None,
            full_name: id.to_string(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn position(id: &str, enterprise: Option<&str>) -> Position {
        Position {
            id: PositionId(id.to_string()),
            enterprise_id: enterprise.map(|e| EnterpriseId(e.to_string())),
            name: id.to_string(),
            hierarchy_level: 1,
            default_scope: None,
        }
    }

    #[test]
    fn children_index_follows_parent_pointers() {
        let directory = OrgDirectory::new(
            vec![
                department("root", "e1", None),
                department("a", "e1", Some("root")),
                department("b", "e1", Some("root")),
                department("a-1", "e1", Some("a")),
            ],
            vec![],
            vec![],
        );

        let mut children: Vec<&str> = directory
            .children_of(&DepartmentId("root".to_string()))
            .iter()
            .map(|id| id.0.as_str())
            .collect();
        children.sort_unstable();
        assert_eq!(children, ["a", "b"]);
        assert!(directory.children_of(&DepartmentId("a-1".to_string())).is_empty());
    }

    #[test]
    fn active_employee_listing_filters_status_and_enterprise() {
        let directory = OrgDirectory::new(
            vec![],
            vec![],
            vec![
                employee("emp-1", "e1", EmployeeStatus::Active),
                employee("emp-2", "e1", EmployeeStatus::Terminated),
                employee("emp-3", "e2", EmployeeStatus::Active),
            ],
        );

        let enterprise = EnterpriseId("e1".to_string());
        let ids: Vec<&str> =
            directory.active_employees_in(&enterprise).map(|e| e.id.0.as_str()).collect();
        assert_eq!(ids, ["emp-1"]);
    }

    #[test]
    fn global_position_templates_are_visible_to_every_enterprise() {
        let directory = OrgDirectory::new(
            vec![],
            vec![position("pos-local", Some("e1")), position("pos-global", None)],
            vec![],
        );

        let e1 = EnterpriseId("e1".to_string());
        let e2 = EnterpriseId("e2".to_string());
        assert_eq!(directory.positions_visible_to(&e1).count(), 2);
        assert_eq!(directory.positions_visible_to(&e2).count(), 1);
    }
}
