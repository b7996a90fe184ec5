//! Aggregated counts reported by the statistics tool.

use serde::Serialize;

/// Render `passed / total` as a one-decimal percentage, or `"N/A"` when
/// there is nothing to divide by.
///
/// ```
/// use testhub_domain::format_pass_rate;
///
/// assert_eq!(format_pass_rate(3, 10), "30.0%");
/// assert_eq!(format_pass_rate(0, 0), "N/A");
/// ```
pub fn format_pass_rate(passed: usize, total: usize) -> String {
    if total == 0 {
        return "N/A".to_string();
    }
    format!("{:.1}%", passed as f64 / total as f64 * 100.0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub blocked: usize,
    pub skipped: usize,
    pub untested: usize,
    pub pass_rate: String,
}

impl TestCaseStats {
    pub fn new(
        total: usize,
        passed: usize,
        failed: usize,
        blocked: usize,
        skipped: usize,
        untested: usize,
    ) -> Self {
        Self {
            total,
            passed,
            failed,
            blocked,
            skipped,
            untested,
            pass_rate: format_pass_rate(passed, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
    /// Defects with CRITICAL severity, regardless of status.
    pub critical: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementStats {
    pub total: usize,
    pub draft: usize,
    pub pending_review: usize,
    pub approved: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Combined view returned when no statistics type is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub projects: usize,
    pub test_cases: TestCaseStats,
    pub defects: DefectStats,
    pub requirements: RequirementStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_rate_formatting() {
        assert_eq!(format_pass_rate(0, 0), "N/A");
        assert_eq!(format_pass_rate(3, 10), "30.0%");
        assert_eq!(format_pass_rate(1, 3), "33.3%");
        assert_eq!(format_pass_rate(2, 3), "66.7%");
        assert_eq!(format_pass_rate(5, 5), "100.0%");
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = TestCaseStats::new(10, 3, 2, 1, 0, 4);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["passRate"], "30.0%");
        assert_eq!(json["untested"], 4);

        let requirements = RequirementStats {
            total: 1,
            draft: 0,
            pending_review: 1,
            approved: 0,
            in_progress: 0,
            completed: 0,
        };
        let json = serde_json::to_value(&requirements).unwrap();
        assert_eq!(json["pendingReview"], 1);
    }
}
