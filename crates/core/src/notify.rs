use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::process::ApprovalProcess;
use crate::routing::RoutingOutcome;

/// Message template for one business module. Placeholders use the
/// `{{variable}}` form; available variables are `requester_name`,
/// `process_name`, `module`, `approver_name` and `scope`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub module: String,
    pub subject: String,
    pub body: String,
}

/// Payload handed to the delivery layer (push, email, in-app). Transport,
/// templating engines and audit persistence stay outside this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalNotification {
    pub approver_id: EmployeeId,
    pub subject: String,
    pub body: String,
}

/// Turns a routing outcome into one notification per approver of record.
#[derive(Clone, Debug, Default)]
pub struct NotificationComposer {
    templates: HashMap<String, NotificationTemplate>,
}

const DEFAULT_SUBJECT: &str = "Approval required: {{process_name}}";
const DEFAULT_BODY: &str = "{{requester_name}} submitted a {{process_name}} request \
                            that needs your decision (authority: {{scope}}).";

impl NotificationComposer {
    pub fn new(templates: Vec<NotificationTemplate>) -> Self {
        let templates = templates
            .into_iter()
            .map(|template| (normalize_key(&template.module), template))
            .collect();
        Self { templates }
    }

    pub fn compose(
        &self,
        outcome: &RoutingOutcome,
        requester: &Employee,
        process: &ApprovalProcess,
    ) -> Vec<ApprovalNotification> {
        let template = self.templates.get(&normalize_key(&process.module));
        let subject_template =
            template.map(|entry| entry.subject.as_str()).unwrap_or(DEFAULT_SUBJECT);
        let body_template = template.map(|entry| entry.body.as_str()).unwrap_or(DEFAULT_BODY);

        outcome
            .approvers
            .iter()
            .map(|approver| {
                let variables = HashMap::from([
                    ("requester_name".to_string(), requester.full_name.clone()),
                    ("process_name".to_string(), process.name.clone()),
                    ("module".to_string(), process.module.clone()),
                    ("approver_name".to_string(), approver.full_name.clone()),
                    ("scope".to_string(), approver.effective_scope.as_str().to_string()),
                ]);

                ApprovalNotification {
                    approver_id: approver.employee_id.clone(),
                    subject: substitute_variables(subject_template, &variables),
                    body: substitute_variables(body_template, &variables),
                }
            })
            .collect()
    }
}

fn substitute_variables(template: &str, variables: &HashMap<String, String>) -> String {
    let mut output = template.to_string();
    for (key, value) in variables {
        output = output.replace(&format!("{{{{{key}}}}}"), value);
    }
    output
}

fn normalize_key(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}
