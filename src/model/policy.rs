use strum_macros::{Display, EnumString};

use crate::error::LeaveError;
use crate::model::leave_request::LeaveCategory;

/// Allowed request length per category, in days, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPolicy {
    pub standard_min_days: u32,
    pub standard_max_days: u32,
    pub long_form_min_days: u32,
    pub long_form_max_days: u32,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            standard_min_days: 4,
            standard_max_days: 14,
            long_form_min_days: 20,
            long_form_max_days: 40,
        }
    }
}

impl DurationPolicy {
    pub fn bounds(&self, category: LeaveCategory) -> (u32, u32) {
        match category {
            LeaveCategory::LongForm => (self.long_form_min_days, self.long_form_max_days),
            LeaveCategory::Standard => (self.standard_min_days, self.standard_max_days),
        }
    }

    pub fn check(&self, category: LeaveCategory, duration_days: i64) -> Result<(), LeaveError> {
        let (min_days, max_days) = self.bounds(category);

        if duration_days < i64::from(min_days) {
            return Err(LeaveError::BelowMinimumDuration(min_days));
        }
        if duration_days > i64::from(max_days) {
            return Err(LeaveError::AboveMaximumDuration(max_days));
        }
        Ok(())
    }
}

/// Which field decides that two requests belong to the same employee
/// when looking for an already active request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConflictKey {
    #[default]
    EmployeeId,
    Name,
}

/// Submission rules applied by the leave service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeavePolicy {
    pub duration: DurationPolicy,
    pub require_reason: bool,
    pub conflict_key: ConflictKey,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            duration: DurationPolicy::default(),
            require_reason: true,
            conflict_key: ConflictKey::EmployeeId,
        }
    }
}
