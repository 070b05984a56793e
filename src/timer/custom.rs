//! Pending custom-duration input

use serde::{Deserialize, Serialize};

/// Minutes/seconds text as typed by the user, before it is committed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomInput {
    pub minutes: String,
    pub seconds: String,
}

impl CustomInput {
    pub fn new(minutes: impl Into<String>, seconds: impl Into<String>) -> Self {
        Self {
            minutes: minutes.into(),
            seconds: seconds.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.trim().is_empty() && self.seconds.trim().is_empty()
    }

    /// Total duration in seconds, or `None` when the input cannot start a session.
    ///
    /// Blank fields count as zero. Non-numeric or negative fields, and a zero
    /// total, are rejected.
    pub fn total_seconds(&self) -> Option<u64> {
        let minutes = parse_field(&self.minutes)?;
        let seconds = parse_field(&self.seconds)?;
        let total = minutes.checked_mul(60)?.checked_add(seconds)?;
        (total > 0).then_some(total)
    }
}

fn parse_field(field: &str) -> Option<u64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0);
    }
    field.parse::<u64>().ok()
}
