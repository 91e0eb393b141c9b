use std::fmt;

use chrono::NaiveDate;

/// Renders a date as `DD.MM.YYYY` for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GermanDate(pub NaiveDate);

impl fmt::Display for GermanDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d.%m.%Y"))
    }
}
