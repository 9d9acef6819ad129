//! CGPA → credit ceiling resolution

use advisor_core::PolicyTable;
use serde::Serialize;

/// Ceiling used when no Credit Limit row matches the CGPA
pub const DEFAULT_CREDIT_LIMIT: u32 = 12;

/// Resolved credit ceiling for one CGPA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditLimit {
    pub max_credits: u32,
    /// Index of the matching row in the policy table; `None` when the
    /// default was used
    pub policy_row: Option<usize>,
}

impl CreditLimit {
    pub fn is_default(&self) -> bool {
        self.policy_row.is_none()
    }
}

/// Maps a CGPA to its maximum credit hours.
///
/// Credit Limit rows are tried in table order and the first matching row
/// wins. Rows with a malformed condition never match. When nothing
/// matches, [`DEFAULT_CREDIT_LIMIT`] is returned and the result is marked
/// as defaulted so callers can report the policy table.
pub fn resolve_credit_limit(cgpa: f64, policies: &PolicyTable) -> CreditLimit {
    policies
        .rules()
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.is_credit_limit())
        .find(|(_, rule)| rule.condition.matches(cgpa))
        .map(|(row, rule)| CreditLimit {
            max_credits: rule.max_credits,
            policy_row: Some(row),
        })
        .unwrap_or(CreditLimit {
            max_credits: DEFAULT_CREDIT_LIMIT,
            policy_row: None,
        })
}
