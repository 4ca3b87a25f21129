//! Dotted-version ordering for the update check.
//!
//! The launcher compares its own version against the latest published one to
//! decide whether to offer a download.  Fetching the published version is a
//! transport concern and lives elsewhere; only the ordering rule is domain
//! logic.

use std::cmp::Ordering;

/// Compares two dotted version strings numerically, part by part.
///
/// Missing parts count as zero, so `"1.2"` equals `"1.2.0"`.  Parts that do
/// not parse as numbers also count as zero.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |version: &str| -> Vec<u64> {
        version
            .split('.')
            .map(|part| part.parse().unwrap_or(0))
            .collect()
    };
    let pa = parse(a);
    let pb = parse(b);

    for i in 0..pa.len().max(pb.len()) {
        let na = pa.get(i).copied().unwrap_or(0);
        let nb = pb.get(i).copied().unwrap_or(0);
        match na.cmp(&nb) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_versions_compare_equal() {
        assert_eq!(compare_versions("1.2.3", "1.2.3"), Ordering::Equal);
    }

    #[test]
    fn test_each_part_is_compared_numerically() {
        assert_eq!(compare_versions("2.0.0", "1.9.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.10.0", "1.9.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.2.3", "1.2.10"), Ordering::Less);
    }

    #[test]
    fn test_missing_parts_count_as_zero() {
        assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.2", "1.2.1"), Ordering::Less);
        assert_eq!(compare_versions("1.2.1", "1.2"), Ordering::Greater);
    }

    #[test]
    fn test_non_numeric_parts_count_as_zero() {
        assert_eq!(compare_versions("1.x.3", "1.0.3"), Ordering::Equal);
    }

    #[test]
    fn test_newer_release_reads_as_greater_than_current() {
        // The shape of the actual update decision: latest vs running.
        assert_eq!(compare_versions("1.4.0", "1.3.2"), Ordering::Greater);
    }
}
