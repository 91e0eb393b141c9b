use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveKey, LeaveRequest, LeaveStatus};
use crate::model::policy::ConflictKey;

/// Root persisted document: every request in insertion order plus the blocked ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "requests": [{
        "employeeName": "Alice",
        "employeeId": "E1",
        "startDate": "2024-01-01",
        "endDate": "2024-01-05",
        "category": "standard",
        "status": "submitted"
    }],
    "blocked": ["E9"]
}))]
pub struct Store {
    #[serde(default, alias = "urlaube")]
    pub requests: Vec<LeaveRequest>,
    #[serde(default, alias = "gesperrt")]
    pub blocked: Vec<String>,
}

impl Store {
    pub fn is_blocked(&self, employee_id: &str) -> bool {
        self.blocked.iter().any(|id| id == employee_id)
    }

    /// Flips the block state of `employee_id` and returns the new state.
    pub fn toggle_block(&mut self, employee_id: &str) -> bool {
        if self.is_blocked(employee_id) {
            self.blocked.retain(|id| id != employee_id);
            false
        } else {
            self.blocked.push(employee_id.to_string());
            true
        }
    }

    /// Drops repeated ids while keeping first-seen order.
    pub fn dedup_blocked(&mut self) {
        let mut seen = Vec::with_capacity(self.blocked.len());
        self.blocked.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(id.clone());
                true
            }
        });
    }

    /// First submitted or approved request belonging to the same employee.
    pub fn active_request(
        &self,
        conflict_key: ConflictKey,
        employee_name: &str,
        employee_id: &str,
    ) -> Option<&LeaveRequest> {
        self.requests.iter().find(|r| {
            r.status.is_active()
                && match conflict_key {
                    ConflictKey::EmployeeId => r.employee_id == employee_id,
                    ConflictKey::Name => r.employee_name == employee_name,
                }
        })
    }

    pub fn find_submitted_mut(&mut self, key: &LeaveKey) -> Option<&mut LeaveRequest> {
        self.requests
            .iter_mut()
            .find(|r| r.status == LeaveStatus::Submitted && r.matches(key))
    }

    /// Removes every request matching `key`, returning how many were dropped.
    pub fn remove_matching(&mut self, key: &LeaveKey) -> usize {
        let before = self.requests.len();
        self.requests.retain(|r| !r.matches(key));
        before - self.requests.len()
    }

    pub fn legacy_view(&self) -> LegacyDocument<'_> {
        LegacyDocument {
            urlaube: self
                .requests
                .iter()
                .map(|r| LegacyRequest {
                    name: &r.employee_name,
                    dienstnummer: &r.employee_id,
                    start: r.start_date,
                    end: r.end_date,
                    category: &r.category,
                    grund: r.reason.as_deref(),
                    status: r.status.legacy_name(),
                })
                .collect(),
            gesperrt: &self.blocked,
        }
    }
}

/// The document under the keys and status words of the first deployment,
/// served on `/data` for its frontend.
#[derive(Debug, Serialize)]
pub struct LegacyDocument<'a> {
    urlaube: Vec<LegacyRequest<'a>>,
    gesperrt: &'a [String],
}

#[derive(Debug, Serialize)]
struct LegacyRequest<'a> {
    name: &'a str,
    dienstnummer: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    #[serde(rename = "type")]
    category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    grund: Option<&'a str>,
    status: &'static str,
}
