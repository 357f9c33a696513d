use std::collections::HashSet;

use crate::domain::department::DepartmentId;
use crate::domain::employee::Employee;
use crate::domain::scope::ApprovalScope;
use crate::routing::directory::OrgDirectory;

/// Whether the requester falls inside the approver's authority for the
/// given effective scope.
///
/// Total and side-effect free. Missing or dangling department records make
/// the answer `false`; they never abort routing for the other candidates.
pub fn is_within_scope(
    requester: &Employee,
    approver: &Employee,
    scope: ApprovalScope,
    directory: &OrgDirectory,
) -> bool {
    match scope {
        ApprovalScope::OwnDepartment => requester.department_id == approver.department_id,
        ApprovalScope::Enterprise => requester.enterprise_id == approver.enterprise_id,
        ApprovalScope::ChildDepartments => {
            department_subtree(directory, approver).contains(&requester.department_id)
        }
    }
}

/// The approver's department plus every descendant, by explicit worklist.
///
/// The visited set guarantees termination on cyclic parent data, and the
/// enterprise check keeps departments of other tenants unreachable even if
/// a parent pointer crosses the boundary. The root id is included whether
/// or not its record exists, so `own_department`-style reflexivity holds
/// for `child_departments` too.
fn department_subtree(directory: &OrgDirectory, approver: &Employee) -> HashSet<DepartmentId> {
    let mut visited: HashSet<DepartmentId> = HashSet::new();
    let mut worklist: Vec<DepartmentId> = vec![approver.department_id.clone()];

    while let Some(current) = worklist.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }

        for child_id in directory.children_of(&current) {
            let Some(child) = directory.department(child_id) else {
                continue;
            };
            if child.enterprise_id != approver.enterprise_id {
                continue;
            }
            if !visited.contains(child_id) {
                worklist.push(child_id.clone());
            }
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::is_within_scope;
    use crate::domain::department::{Department, DepartmentId};
    use crate::domain::employee::{Employee, EmployeeId, EmployeeStatus};
    use crate::domain::enterprise::EnterpriseId;
    use crate::domain::scope::ApprovalScope;
    use crate::routing::directory::OrgDirectory;

    fn department(id: &str, enterprise: &str, parent: Option<&str>) -> Department {
        Department {
            id: DepartmentId(id.to_string()),
            enterprise_id: EnterpriseId(enterprise.to_string()),
            name: id.to_string(),
            parent_id: parent.map(|p| DepartmentId(p.to_string())),
        }
    }

    fn employee(id: &str, enterprise: &str, department: &str) -> Employee {
        let now = Utc::now();
        Employee {
            id: EmployeeId(id.to_string()),
            enterprise_id: EnterpriseId(enterprise.to_string()),
            department_id: DepartmentId(department.to_string()),
            position_id: None,
            full_name: id.to_string(),
            status: EmployeeStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn tree_directory() -> OrgDirectory {
        // north
        //   north-warehouse
        //     north-warehouse-night
        // south
        OrgDirectory::new(
            vec![
                department("north", "e1", None),
                department("north-warehouse", "e1", Some("north")),
                department("north-warehouse-night", "e1", Some("north-warehouse")),
                department("south", "e1", None),
            ],
            vec![],
            vec![],
        )
    }

    #[test]
    fn own_department_requires_exact_department_match() {
        let directory = tree_directory();
        let approver = employee("mgr", "e1", "north");
        let same = employee("req-1", "e1", "north");
        let child = employee("req-2", "e1", "north-warehouse");

        assert!(is_within_scope(&same, &approver, ApprovalScope::OwnDepartment, &directory));
        assert!(!is_within_scope(&child, &approver, ApprovalScope::OwnDepartment, &directory));
    }

    #[test]
    fn enterprise_scope_requires_same_enterprise() {
        let directory = tree_directory();
        let approver = employee("mgr", "e1", "north");
        let same_enterprise = employee("req-1", "e1", "south");
        let other_enterprise = employee("req-2", "e2", "south");

        assert!(is_within_scope(
            &same_enterprise,
            &approver,
            ApprovalScope::Enterprise,
            &directory
        ));
        assert!(!is_within_scope(
            &other_enterprise,
            &approver,
            ApprovalScope::Enterprise,
            &directory
        ));
    }

    #[test]
    fn child_departments_contains_own_and_descendants_at_any_depth() {
        let directory = tree_directory();
        let approver = employee("mgr", "e1", "north");

        for dept in ["north", "north-warehouse", "north-warehouse-night"] {
            let requester = employee("req", "e1", dept);
            assert!(
                is_within_scope(&requester, &approver, ApprovalScope::ChildDepartments, &directory),
                "{dept} should be contained"
            );
        }
    }

    #[test]
    fn child_departments_excludes_siblings_and_ancestors() {
        let directory = tree_directory();
        let warehouse_mgr = employee("mgr", "e1", "north-warehouse");

        let sibling = employee("req-1", "e1", "south");
        let ancestor = employee("req-2", "e1", "north");
        assert!(!is_within_scope(
            &sibling,
            &warehouse_mgr,
            ApprovalScope::ChildDepartments,
            &directory
        ));
        assert!(!is_within_scope(
            &ancestor,
            &warehouse_mgr,
            ApprovalScope::ChildDepartments,
            &directory
        ));
    }

    #[test]
    fn cyclic_department_data_terminates() {
        let directory = OrgDirectory::new(
            vec![
                department("a", "e1", Some("c")),
                department("b", "e1", Some("a")),
                department("c", "e1", Some("b")),
                department("outside", "e1", None),
            ],
            vec![],
            vec![],
        );
        let approver = employee("mgr", "e1", "a");

        let inside = employee("req-1", "e1", "c");
        let outside = employee("req-2", "e1", "outside");
        assert!(is_within_scope(&inside, &approver, ApprovalScope::ChildDepartments, &directory));
        assert!(!is_within_scope(&outside, &approver, ApprovalScope::ChildDepartments, &directory));
    }

    #[test]
    fn cross_enterprise_parent_pointers_are_unreachable() {
        let directory = OrgDirectory::new(
            vec![
                department("shared-root", "e1", None),
                department("foreign", "e2", Some("shared-root")),
            ],
            vec![],
            vec![],
        );
        let approver = employee("mgr", "e1", "shared-root");
        let foreign_requester = employee("req", "e2", "foreign");

        assert!(!is_within_scope(
            &foreign_requester,
            &approver,
            ApprovalScope::ChildDepartments,
            &directory
        ));
    }

    #[test]
    fn missing_department_records_mean_not_contained() {
        let directory = tree_directory();
        let approver = employee("mgr", "e1", "ghost-department");
        let requester = employee("req", "e1", "north");

        assert!(!is_within_scope(
            &requester,
            &approver,
            ApprovalScope::ChildDepartments,
            &directory
        ));
        // Reflexivity still holds on the raw id even without a record.
        let ghost_requester = employee("req-2", "e1", "ghost-department");
        assert!(is_within_scope(
            &ghost_requester,
            &approver,
            ApprovalScope::ChildDepartments,
            &directory
        ));
    }
}
