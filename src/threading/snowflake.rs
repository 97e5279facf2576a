//! Snowflake id comparison
//!
//! Platform ids are monotonic integers that no longer fit in an f64 mantissa, so
//! they are compared digit-wise: strip leading zeros, a longer digit string is the
//! larger number, equal lengths compare lexicographically.

use std::cmp::Ordering;

/// Borrowed id with numeric-magnitude ordering.
///
/// Ids that are not plain digit strings sort after all numeric ids and compare
/// lexicographically among themselves. Ids of equal magnitude but different text
/// (`"007"` vs `"7"`) fall back to a raw comparison so the order stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnowflakeId<'a>(&'a str);

impl<'a> SnowflakeId<'a> {
    pub fn new(raw: &'a str) -> Self {
        SnowflakeId(raw)
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// Significant digits, or `None` for non-numeric ids
    fn magnitude(&self) -> Option<&'a str> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(trimmed.trim_start_matches('0'))
    }
}

impl Ord for SnowflakeId<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_magnitude = match (self.magnitude(), other.magnitude()) {
            (Some(a), Some(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_magnitude.then_with(|| self.0.cmp(other.0))
    }
}

impl PartialOrd for SnowflakeId<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two id strings by numeric magnitude
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    SnowflakeId::new(a).cmp(&SnowflakeId::new(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beyond_float_precision() {
        // Both parse to the same f64
        assert_eq!(
            compare_ids("10000000000000000001", "10000000000000000002"),
            Ordering::Less
        );
        assert_eq!(
            compare_ids("1790000000000000001", "1790000000000000000"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_length_beats_lexical_order() {
        assert_eq!(compare_ids("9", "10"), Ordering::Less);
        assert_eq!(compare_ids("99999", "100000"), Ordering::Less);
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(compare_ids("0010", "9"), Ordering::Greater);
        // Same magnitude, still totally ordered
        assert_ne!(compare_ids("007", "7"), Ordering::Equal);
        assert_eq!(compare_ids("000", "0"), compare_ids("000", "0"));
    }

    #[test]
    fn test_non_numeric_sorts_last() {
        assert_eq!(compare_ids("123", "abc"), Ordering::Less);
        assert_eq!(compare_ids("abc", "abd"), Ordering::Less);
        assert_eq!(compare_ids("", "0"), Ordering::Greater);
    }

    #[test]
    fn test_equal_ids() {
        assert_eq!(compare_ids("42", "42"), Ordering::Equal);
    }
}
