//! Closed value sets for status, priority, severity and role fields.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(DomainError::InvalidEnumValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_set!(
    /// Execution status of a test case.
    TestCaseStatus, "test case status", {
        Untested => "UNTESTED",
        Passed => "PASSED",
        Failed => "FAILED",
        Blocked => "BLOCKED",
        Skipped => "SKIPPED",
    }
);

closed_set!(
    /// Shared by test cases, requirements and defects. P0 is the most urgent.
    Priority, "priority", {
        P0 => "P0",
        P1 => "P1",
        P2 => "P2",
        P3 => "P3",
    }
);

closed_set!(
    RequirementStatus, "requirement status", {
        Draft => "DRAFT",
        PendingReview => "PENDING_REVIEW",
        Approved => "APPROVED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
    }
);

closed_set!(
    DefectStatus, "defect status", {
        Open => "OPEN",
        InProgress => "IN_PROGRESS",
        Resolved => "RESOLVED",
        Closed => "CLOSED",
    }
);

closed_set!(
    Severity, "severity", {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Critical => "CRITICAL",
    }
);

closed_set!(
    TestPlanStatus, "test plan status", {
        Draft => "DRAFT",
        Active => "ACTIVE",
        Completed => "COMPLETED",
        Archived => "ARCHIVED",
    }
);

closed_set!(
    UserRole, "user role", {
        Admin => "ADMIN",
        Manager => "MANAGER",
        Tester => "TESTER",
        Developer => "DEVELOPER",
    }
);

closed_set!(
    /// Slice selected by the statistics tool's `type` argument.
    StatisticsScope, "statistics type", {
        TestCases => "testcases",
        Defects => "defects",
        Requirements => "requirements",
    }
);

impl Default for TestCaseStatus {
    fn default() -> Self {
        TestCaseStatus::Untested
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::P2
    }
}

impl Default for RequirementStatus {
    fn default() -> Self {
        RequirementStatus::Draft
    }
}

impl Default for DefectStatus {
    fn default() -> Self {
        DefectStatus::Open
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl Default for TestPlanStatus {
    fn default() -> Self {
        TestPlanStatus::Draft
    }
}
