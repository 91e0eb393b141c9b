use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

pub const DEFAULT_CATEGORY: &str = "standard";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

// older files hold service numbers as JSON numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

// null or empty falls back to the default category
fn category_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let category = Option::<String>::deserialize(deserializer)?;
    Ok(category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(default_category))
}

/// Lifecycle status of a leave request.
///
/// `Submitted` moves to `Approved` or `Rejected` exactly once; both are terminal.
/// The German aliases are the values written by the first deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    #[serde(alias = "eingereicht")]
    Submitted,
    #[serde(alias = "genehmigt")]
    Approved,
    #[serde(alias = "abgelehnt")]
    Rejected,
}

impl LeaveStatus {
    /// Submitted and approved requests block further submissions.
    pub fn is_active(self) -> bool {
        matches!(self, LeaveStatus::Submitted | LeaveStatus::Approved)
    }

    pub fn legacy_name(self) -> &'static str {
        match self {
            LeaveStatus::Submitted => "eingereicht",
            LeaveStatus::Approved => "genehmigt",
            LeaveStatus::Rejected => "abgelehnt",
        }
    }
}

/// Duration class of a request, resolved from the free-form `category` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum LeaveCategory {
    #[strum(serialize = "standard")]
    Standard,
    #[strum(serialize = "longForm", serialize = "longVacationForm")]
    LongForm,
}

impl LeaveCategory {
    /// Unknown categories fall back to `Standard`.
    pub fn of(category: &str) -> Self {
        category.parse().unwrap_or(LeaveCategory::Standard)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "employeeName": "Alice",
    "employeeId": "E1",
    "startDate": "2024-01-01",
    "endDate": "2024-01-05",
    "category": "standard",
    "reason": "Familienbesuch",
    "status": "submitted"
}))]
pub struct LeaveRequest {
    /// display name of the requester
    #[serde(alias = "name")]
    pub employee_name: String,
    /// service number ("Dienstnummer")
    #[serde(alias = "dienstnummer", deserialize_with = "string_or_number")]
    pub employee_id: String,
    #[serde(alias = "start")]
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[serde(alias = "end")]
    #[schema(example = "2024-01-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(
        default = "default_category",
        alias = "type",
        deserialize_with = "category_or_default"
    )]
    #[schema(example = "standard")]
    pub category: String,
    #[serde(default, alias = "grund", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Inclusive length of the request in calendar days.
    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }

    pub fn matches(&self, key: &LeaveKey) -> bool {
        let same_requester = match &key.requester {
            Requester::EmployeeId(id) => self.employee_id == *id,
            Requester::Name(name) => self.employee_name == *name,
        };
        same_requester && self.start_date == key.start_date && self.end_date == key.end_date
    }
}

/// Inclusive day count between two dates; both endpoints are leave days.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Whose request a selector points at. Clients of the first deployment only
/// send the display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    EmployeeId(String),
    Name(String),
}

/// Identifies a single request for approve/reject/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveKey {
    pub requester: Requester,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
