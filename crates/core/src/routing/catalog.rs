use std::collections::HashMap;

use crate::domain::process::{ApprovalFlowStep, ApprovalProcess, ProcessId};

/// Approval process definitions keyed by their stable code.
///
/// Codes are matched case-insensitively with surrounding whitespace ignored,
/// the same normalization callers get from the administrative layer.
#[derive(Clone, Debug, Default)]
pub struct ProcessCatalog {
    processes: HashMap<String, ApprovalProcess>,
    steps: HashMap<ProcessId, Vec<ApprovalFlowStep>>,
}

impl ProcessCatalog {
    pub fn new(processes: Vec<ApprovalProcess>, steps: Vec<ApprovalFlowStep>) -> Self {
        let processes = processes
            .into_iter()
            .map(|process| (normalize_code(&process.code), process))
            .collect();

        let mut grouped: HashMap<ProcessId, Vec<ApprovalFlowStep>> = HashMap::new();
        for step in steps {
            grouped.entry(step.process_id.clone()).or_default().push(step);
        }
        for steps in grouped.values_mut() {
            steps.sort_by_key(|step| step.step_order);
        }

        Self { processes, steps: grouped }
    }

    pub fn find(&self, code: &str) -> Option<&ApprovalProcess> {
        self.processes.get(&normalize_code(code))
    }

    pub fn steps_for(&self, process_id: &ProcessId) -> &[ApprovalFlowStep] {
        self.steps.get(process_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub(crate) fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}
