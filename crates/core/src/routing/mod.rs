pub mod catalog;
pub mod containment;
pub mod directory;
pub mod scope;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::position::{Position, PositionId};
use crate::domain::process::{ApprovalFlowStep, StepSelector};
use crate::domain::scope::ApprovalScope;

pub use catalog::ProcessCatalog;
pub use containment::is_within_scope;
pub use directory::OrgDirectory;
pub use scope::resolve_effective_scope;

/// One employee that must be notified for approval, with the authority the
/// routing evaluation granted them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedApprover {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub effective_scope: ApprovalScope,
    pub can_approve: bool,
    pub can_reject: bool,
}

/// Result of one routing evaluation. An empty approver list is a legitimate
/// outcome (unknown code, disabled process, nobody in scope), never an
/// error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingOutcome {
    pub process_code: String,
    pub requester_id: EmployeeId,
    pub approvers: Vec<ResolvedApprover>,
}

impl RoutingOutcome {
    fn empty(process_code: &str, requester_id: &EmployeeId) -> Self {
        Self {
            process_code: process_code.to_string(),
            requester_id: requester_id.clone(),
            approvers: Vec::new(),
        }
    }

    pub fn approver_ids(&self) -> Vec<EmployeeId> {
        self.approvers.iter().map(|approver| approver.employee_id.clone()).collect()
    }
}

/// Decides which employees must approve a request originated by a given
/// requester, and under which authority scope.
///
/// Purely computational over a consistent snapshot: no locking, no I/O, no
/// retries. Safe to call concurrently from any number of request handlers.
#[derive(Clone, Debug)]
pub struct RoutingEngine {
    directory: OrgDirectory,
    catalog: ProcessCatalog,
}

impl RoutingEngine {
    pub fn new(directory: OrgDirectory, catalog: ProcessCatalog) -> Self {
        Self { directory, catalog }
    }

    pub fn directory(&self) -> &OrgDirectory {
        &self.directory
    }

    /// Convenience entry point: just the employee ids to notify.
    pub fn resolve_approvers(&self, process_code: &str, requester_id: &EmployeeId) -> Vec<EmployeeId> {
        self.resolve_routing(process_code, requester_id).approver_ids()
    }

    /// Full evaluation with per-approver detail for callers that compose
    /// notifications or render capabilities.
    pub fn resolve_routing(&self, process_code: &str, requester_id: &EmployeeId) -> RoutingOutcome {
        let Some(process) = self.catalog.find(process_code) else {
            return RoutingOutcome::empty(process_code, requester_id);
        };
        if !process.is_active || !process.requires_approval {
            return RoutingOutcome::empty(process_code, requester_id);
        }

        let Some(requester) = self.directory.employee(requester_id) else {
            return RoutingOutcome::empty(process_code, requester_id);
        };
        if !requester.is_active() {
            return RoutingOutcome::empty(process_code, requester_id);
        }

        // Steps applicable to the requester's enterprise: global ones and
        // enterprise-specific ones are pooled with no precedence.
        let applicable_steps: Vec<&ApprovalFlowStep> = self
            .catalog
            .steps_for(&process.id)
            .iter()
            .filter(|step| step.is_active)
            .filter(|step| {
                step.enterprise_id.is_none()
                    || step.enterprise_id.as_ref() == Some(&requester.enterprise_id)
            })
            .collect();

        let qualifying = self.qualifying_positions(&applicable_steps, requester);

        // Candidates come from the id-keyed directory, so duplicate input
        // rows were already collapsed at construction.
        let mut approvers = Vec::new();
        for candidate in self.directory.active_employees_in(&requester.enterprise_id) {
            if candidate.id == requester.id {
                continue;
            }
            let Some(position_id) = &candidate.position_id else {
                continue;
            };
            if !qualifying.contains(position_id) {
                continue;
            }
            let Some(position) = self.directory.position(position_id) else {
                continue;
            };

            let matching: Vec<&ApprovalFlowStep> = applicable_steps
                .iter()
                .copied()
                .filter(|step| step_matches(step, position))
                .collect();
            let effective_scope = resolve_effective_scope(position.default_scope, &matching);

            if !is_within_scope(requester, candidate, effective_scope, &self.directory) {
                continue;
            }

            approvers.push(ResolvedApprover {
                employee_id: candidate.id.clone(),
                full_name: candidate.full_name.clone(),
                effective_scope,
                can_approve: matching.iter().any(|step| step.can_approve),
                can_reject: matching.iter().any(|step| step.can_reject),
            });
        }

        // Deterministic output for tests and CLI diffing; callers must not
        // depend on the ordering.
        approvers.sort_by(|left, right| left.employee_id.0.cmp(&right.employee_id.0));

        RoutingOutcome {
            process_code: process_code.to_string(),
            requester_id: requester_id.clone(),
            approvers,
        }
    }

    /// Position ids qualified by any applicable step. Steps with a
    /// malformed selector qualify nobody.
    fn qualifying_positions(
        &self,
        steps: &[&ApprovalFlowStep],
        requester: &Employee,
    ) -> HashSet<PositionId> {
        let mut qualifying = HashSet::new();
        for step in steps {
            match step.selector() {
                Some(StepSelector::MinHierarchyLevel(threshold)) => {
                    for position in self.directory.positions_visible_to(&requester.enterprise_id) {
                        if position.hierarchy_level >= threshold {
                            qualifying.insert(position.id.clone());
                        }
                    }
                }
                Some(StepSelector::Position(position_id)) => {
                    qualifying.insert(position_id);
                }
                None => {}
            }
        }
        qualifying
    }
}

fn step_matches(step: &ApprovalFlowStep, position: &Position) -> bool {
    match step.selector() {
        Some(StepSelector::MinHierarchyLevel(threshold)) => position.hierarchy_level >= threshold,
        Some(StepSelector::Position(position_id)) => position_id == position.id,
        None => false,
    }
}
