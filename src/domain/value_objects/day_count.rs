//! Day quantities

use serde::{Deserialize, Serialize};

/// A non-negative number of whole days.
///
/// Requests, limits and allowances are all counted in whole days; fractional
/// days are out of scope for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayCount(u32);

impl DayCount {
    pub const ZERO: Self = Self(0);

    pub fn new(days: u32) -> Self {
        Self(days)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Difference, clamped at zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl std::fmt::Display for DayCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DayCount {
    fn from(days: u32) -> Self {
        Self(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add_accumulates() {
        let total = DayCount::new(3).checked_add(DayCount::new(4)).unwrap();
        assert_eq!(total, DayCount::new(7));
    }

    #[test]
    fn test_checked_add_detects_overflow() {
        assert!(DayCount::new(u32::MAX).checked_add(DayCount::new(1)).is_none());
    }

    #[test]
    fn test_saturating_sub_clamps_at_zero() {
        assert_eq!(DayCount::new(2).saturating_sub(DayCount::new(5)), DayCount::ZERO);
    }
}
