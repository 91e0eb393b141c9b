use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::db::JsonStore;
use crate::error::LeaveError;
use crate::model::leave_request::{
    DEFAULT_CATEGORY, LeaveCategory, LeaveKey, LeaveRequest, LeaveStatus, Requester,
    duration_days,
};
use crate::model::leave_store::Store;
use crate::model::policy::LeavePolicy;
use crate::utils::date_format::GermanDate;

/// Payload of a new leave request. Every field may be absent on the wire so
/// that missing values surface as a validation error, not a decode error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitLeave {
    #[serde(alias = "employeeName")]
    #[schema(example = "Alice")]
    pub name: Option<String>,
    #[serde(alias = "dienstnummer")]
    #[schema(example = "E1")]
    pub employee_id: Option<String>,
    #[serde(alias = "startDate")]
    #[schema(example = "2024-01-01", format = "date")]
    pub start: Option<String>,
    #[serde(alias = "endDate")]
    #[schema(example = "2024-01-05", format = "date")]
    pub end: Option<String>,
    #[serde(alias = "type")]
    #[schema(example = "standard")]
    pub category: Option<String>,
    #[serde(alias = "grund")]
    #[schema(example = "Familienbesuch")]
    pub reason: Option<String>,
}

/// Selects one request by employee id and its exact date range. Without an
/// id the display name is matched instead.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaveSelector {
    #[serde(alias = "employeeName")]
    #[schema(example = "Alice")]
    pub name: Option<String>,
    #[serde(alias = "dienstnummer")]
    #[schema(example = "E1")]
    pub employee_id: Option<String>,
    #[serde(alias = "startDate")]
    #[schema(example = "2024-01-01", format = "date")]
    pub start: Option<String>,
    #[serde(alias = "endDate")]
    #[schema(example = "2024-01-05", format = "date")]
    pub end: Option<String>,
}

impl LeaveSelector {
    fn to_key(&self) -> Result<LeaveKey, LeaveError> {
        let requester = match (filled(&self.employee_id), filled(&self.name)) {
            (Some(id), _) => Requester::EmployeeId(id.to_string()),
            (None, Some(name)) => Requester::Name(name.to_string()),
            (None, None) => return Err(LeaveError::MissingFields),
        };
        let (Some(start), Some(end)) = (filled(&self.start), filled(&self.end)) else {
            return Err(LeaveError::MissingFields);
        };

        Ok(LeaveKey {
            requester,
            start_date: parse_date(start)?,
            end_date: parse_date(end)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockToggle {
    #[serde(alias = "dienstnummer")]
    #[schema(example = "E1")]
    pub employee_id: Option<String>,
}

/// Non-blank, trimmed value of an optional field.
fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, LeaveError> {
    value.parse().map_err(|_| LeaveError::InvalidDate)
}

/// Leave requests and the block list over a single JSON document.
///
/// Each operation loads the document, applies its change and writes the whole
/// document back. The lock serializes those cycles across worker threads.
pub struct LeaveService {
    store: JsonStore,
    policy: LeavePolicy,
    lock: Mutex<()>,
}

impl LeaveService {
    pub fn new(store: JsonStore, policy: LeavePolicy) -> Self {
        Self {
            store,
            policy,
            lock: Mutex::new(()),
        }
    }

    // the guard protects no data, so a panicked holder leaves nothing inconsistent
    fn exclusive(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current requests and blocked ids, unfiltered.
    pub fn snapshot(&self) -> Result<Store, LeaveError> {
        let _guard = self.exclusive();
        self.store.load_store()
    }

    /// Validates and records a new request in `submitted` state.
    ///
    /// Checks run in a fixed order and stop at the first failure: required
    /// fields, date syntax, date order, duration bounds of the category, an
    /// already active request of the same employee, the block list.
    #[instrument(skip(self, input), fields(employee_id = ?input.employee_id))]
    pub fn submit(&self, input: &SubmitLeave) -> Result<(), LeaveError> {
        let (Some(name), Some(employee_id), Some(start), Some(end)) = (
            filled(&input.name),
            filled(&input.employee_id),
            filled(&input.start),
            filled(&input.end),
        ) else {
            return Err(LeaveError::MissingFields);
        };
        let reason = filled(&input.reason);
        if self.policy.require_reason && reason.is_none() {
            return Err(LeaveError::MissingFields);
        }

        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        if end_date < start_date {
            return Err(LeaveError::InvertedRange);
        }

        let category = filled(&input.category).unwrap_or(DEFAULT_CATEGORY);
        let days = duration_days(start_date, end_date);
        self.policy
            .duration
            .check(LeaveCategory::of(category), days)?;

        let _guard = self.exclusive();
        let mut store = self.store.load_store()?;

        if let Some(active) = store.active_request(self.policy.conflict_key, name, employee_id) {
            return Err(LeaveError::ActiveRequestExists(GermanDate(active.end_date)));
        }
        if store.is_blocked(employee_id) {
            return Err(LeaveError::EmployeeBlocked);
        }

        store.requests.push(LeaveRequest {
            employee_name: name.to_string(),
            employee_id: employee_id.to_string(),
            start_date,
            end_date,
            category: category.to_string(),
            reason: reason.map(str::to_string),
            status: LeaveStatus::Submitted,
        });
        self.store.save_store(&store)?;

        info!(%start_date, %end_date, days, category, "leave request submitted");
        Ok(())
    }

    pub fn approve(&self, selector: &LeaveSelector) -> Result<(), LeaveError> {
        self.decide(selector, LeaveStatus::Approved)
    }

    pub fn reject(&self, selector: &LeaveSelector) -> Result<(), LeaveError> {
        self.decide(selector, LeaveStatus::Rejected)
    }

    #[instrument(skip(self, selector), fields(employee_id = ?selector.employee_id))]
    fn decide(&self, selector: &LeaveSelector, decision: LeaveStatus) -> Result<(), LeaveError> {
        let key = selector.to_key()?;

        let _guard = self.exclusive();
        let mut store = self.store.load_store()?;

        let request = store
            .find_submitted_mut(&key)
            .ok_or(LeaveError::NotFound)?;
        request.status = decision;
        let days = request.duration_days();
        self.store.save_store(&store)?;

        info!(status = %decision, days, "leave request decided");
        Ok(())
    }

    /// Removes every request matching the selector, whatever its status.
    #[instrument(skip(self, selector), fields(employee_id = ?selector.employee_id))]
    pub fn delete(&self, selector: &LeaveSelector) -> Result<(), LeaveError> {
        let key = selector.to_key()?;

        let _guard = self.exclusive();
        let mut store = self.store.load_store()?;

        let removed = store.remove_matching(&key);
        if removed == 0 {
            return Err(LeaveError::NotFound);
        }
        self.store.save_store(&store)?;

        info!(removed, "leave request deleted");
        Ok(())
    }

    /// Blocks an unblocked id and unblocks a blocked one. Returns `true` when
    /// the id is blocked afterwards.
    #[instrument(skip(self))]
    pub fn toggle_block(&self, employee_id: &str) -> Result<bool, LeaveError> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Err(LeaveError::MissingEmployeeId);
        }

        let _guard = self.exclusive();
        let mut store = self.store.load_store()?;

        let blocked = store.toggle_block(employee_id);
        self.store.save_store(&store)?;

        info!(blocked, "block state changed");
        Ok(blocked)
    }
}
