//! Vote tally value
//!
//! Aggregate counts for one candidate date. Recomputed on demand, never stored.

use serde::Serialize;

/// Counts and positivity of the votes cast on one date option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VoteTally {
    pub yes: u32,
    pub if_need_be: u32,
    pub no: u32,
    pub total: u32,
    /// Share of `yes` votes, 0-100; `if_need_be` does not count as positive
    pub percentage: u8,
}

impl VoteTally {
    /// `total` saturates at `u32::MAX`; the percentage uses the exact sum
    pub fn from_counts(yes: u32, if_need_be: u32, no: u32) -> Self {
        let total = u64::from(yes) + u64::from(if_need_be) + u64::from(no);
        Self {
            yes,
            if_need_be,
            no,
            total: u32::try_from(total).unwrap_or(u32::MAX),
            percentage: rounded_percentage(u64::from(yes), total),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// `round_half_up(100 * part / whole)` in integer arithmetic, 0 when `whole` is 0.
///
/// Saturates at `u8::MAX`; callers pass `part <= whole`.
pub fn rounded_percentage(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let scaled = (u128::from(part) * 200 + u128::from(whole)) / (u128::from(whole) * 2);
    u8::try_from(scaled).unwrap_or(u8::MAX)
}
