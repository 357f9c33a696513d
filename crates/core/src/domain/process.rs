use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::enterprise::EnterpriseId;
use crate::domain::position::PositionId;
use crate::domain::scope::ApprovalScope;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowStepId(pub String);

/// Named approval policy, keyed by a stable `code` that business modules use
/// to trigger routing (`vacation_requests`, `purchase_orders`, ...).
///
/// `requires_approval` is the process-level kill switch: when false, routing
/// is a silent no-op even if the process is active and has steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalProcess {
    pub id: ProcessId,
    pub code: String,
    pub name: String,
    pub module: String,
    pub is_active: bool,
    pub requires_approval: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who qualifies as an approver under a flow step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepSelector {
    /// Any position whose hierarchy level is at or above the threshold.
    MinHierarchyLevel(i32),
    /// One exact position.
    Position(PositionId),
}

/// One rule within an approval process.
///
/// The selector columns mirror the storage model: exactly one of
/// `min_hierarchy_level` / `position_id` must be set. `selector()` returns
/// `None` for malformed rows so the engine can treat them as matching
/// nobody instead of failing the whole resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalFlowStep {
    pub id: FlowStepId,
    pub process_id: ProcessId,
    /// `None` applies the step to every enterprise of the process.
    pub enterprise_id: Option<EnterpriseId>,
    pub min_hierarchy_level: Option<i32>,
    pub position_id: Option<PositionId>,
    /// Authority scope granted by this step; `None` grants the most
    /// restrictive scope.
    pub scope: Option<ApprovalScope>,
    /// Display/workflow sequencing only; not consulted by the scope
    /// resolver.
    pub step_order: i32,
    pub is_active: bool,
    pub can_approve: bool,
    pub can_reject: bool,
}

impl ApprovalFlowStep {
    pub fn selector(&self) -> Option<StepSelector> {
        match (self.min_hierarchy_level, &self.position_id) {
            (Some(level), None) => Some(StepSelector::MinHierarchyLevel(level)),
            (None, Some(position_id)) => Some(StepSelector::Position(position_id.clone())),
            _ => None,
        }
    }

    /// Admin-time validation: persisted steps must carry exactly one
    /// selector. Evaluation never calls this; it tolerates bad rows.
    pub fn validate(&self) -> Result<(), DomainError> {
        match (self.min_hierarchy_level, &self.position_id) {
            (Some(_), Some(_)) => Err(DomainError::AmbiguousStepSelector { step: self.id.clone() }),
            (None, None) => Err(DomainError::MissingStepSelector { step: self.id.clone() }),
            _ => Ok(()),
        }
    }
}
