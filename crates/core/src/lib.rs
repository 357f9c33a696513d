pub mod config;
pub mod domain;
pub mod errors;
pub mod notify;
pub mod routing;

pub use domain::department::{Department, DepartmentId};
pub use domain::employee::{Employee, EmployeeId, EmployeeStatus};
pub use domain::enterprise::{Enterprise, EnterpriseId};
pub use domain::position::{Position, PositionId};
pub use domain::process::{ApprovalFlowStep, ApprovalProcess, FlowStepId, ProcessId, StepSelector};
pub use domain::scope::ApprovalScope;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use notify::{ApprovalNotification, NotificationComposer, NotificationTemplate};
pub use routing::{
    OrgDirectory, ProcessCatalog, ResolvedApprover, RoutingEngine, RoutingOutcome,
};
