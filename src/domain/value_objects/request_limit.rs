//! Per-request day limits
//!
//! Plan data arrives as loose text ("all", "7", sometimes junk). Parsing is
//! total: whatever comes in, the pipeline ends up with a usable limit.

use serde::{Deserialize, Serialize};

use super::day_count::DayCount;

/// Limit applied when plan input cannot be understood.
pub const FALLBACK_LIMIT_DAYS: u32 = 25;

/// Cap on the quantity of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum RequestLimit {
    /// No cap; any quantity passes.
    Unbounded,
    /// At most this many days per request.
    Days(u32),
}

impl RequestLimit {
    /// Parse loose plan input. `"all"` (any casing) means unbounded, a
    /// non-negative number is a bounded limit, and anything else falls back
    /// to [`FALLBACK_LIMIT_DAYS`].
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Self::Unbounded;
        }
        match trimmed.parse::<i64>() {
            Ok(days) if (0..=i64::from(u32::MAX)).contains(&days) => Self::Days(days as u32),
            _ => Self::default(),
        }
    }

    pub fn allows(&self, quantity: DayCount) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Days(max) => quantity.get() <= *max,
        }
    }

    /// The bounded cap, or `None` when unbounded.
    pub fn days(&self) -> Option<u32> {
        match self {
            Self::Unbounded => None,
            Self::Days(max) => Some(*max),
        }
    }
}

impl Default for RequestLimit {
    fn default() -> Self {
        Self::Days(FALLBACK_LIMIT_DAYS)
    }
}

impl std::fmt::Display for RequestLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbounded => write!(f, "all"),
            Self::Days(max) => write!(f, "{max}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_is_unbounded() {
        assert_eq!(RequestLimit::parse("all"), RequestLimit::Unbounded);
        assert_eq!(RequestLimit::parse(" ALL "), RequestLimit::Unbounded);
    }

    #[test]
    fn test_parse_number_is_bounded() {
        assert_eq!(RequestLimit::parse("7"), RequestLimit::Days(7));
        assert_eq!(RequestLimit::parse("0"), RequestLimit::Days(0));
    }

    #[test]
    fn test_parse_negative_falls_back() {
        assert_eq!(RequestLimit::parse("-1"), RequestLimit::Days(FALLBACK_LIMIT_DAYS));
    }

    #[test]
    fn test_parse_junk_falls_back() {
        assert_eq!(
            RequestLimit::parse("unlimited-ish"),
            RequestLimit::Days(FALLBACK_LIMIT_DAYS)
        );
        assert_eq!(RequestLimit::parse(""), RequestLimit::Days(FALLBACK_LIMIT_DAYS));
    }

    #[test]
    fn test_unbounded_allows_anything() {
        assert!(RequestLimit::Unbounded.allows(DayCount::new(u32::MAX)));
    }

    #[test]
    fn test_bounded_allows_up_to_cap() {
        let limit = RequestLimit::Days(5);
        assert!(limit.allows(DayCount::new(5)));
        assert!(!limit.allows(DayCount::new(6)));
    }
}
