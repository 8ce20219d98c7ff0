//! Ordered check table
//!
//! The order below is a dependency chain, not a preference: the manifest and
//! JSON checks run first, then the code chain lint → style fix → style check →
//! mess detection → unit tests. The style fix rewrites files in place, so it
//! must finish before the style check reads them.

use super::classify::{CategoryFlags, FileCategory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one check in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Manifest,
    JsonSyntax,
    Lint,
    StyleFix,
    StyleCheck,
    MessDetection,
    UnitTests,
}

impl CheckKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::Manifest => "manifest",
            CheckKind::JsonSyntax => "json_syntax",
            CheckKind::Lint => "lint",
            CheckKind::StyleFix => "style_fix",
            CheckKind::StyleCheck => "style_check",
            CheckKind::MessDetection => "mess_detection",
            CheckKind::UnitTests => "unit_tests",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which files an executor receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileScope {
    /// Only the changed files in the gating category
    Category,
    /// No file subset; the executor works on the whole project
    Project,
}

/// A single entry of the check table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckStep {
    pub kind: CheckKind,
    /// Step runs only if the change set contains a file of this category
    pub gate: FileCategory,
    /// A failure halts the pipeline and blocks the git action
    pub blocking: bool,
    pub scope: FileScope,
    pub title: &'static str,
}

/// Every check, in execution order
pub const CHECK_STEPS: &[CheckStep] = &[
    CheckStep {
        kind: CheckKind::Manifest,
        gate: FileCategory::DependencyManifest,
        blocking: true,
        scope: FileScope::Category,
        title: "Checking composer files",
    },
    CheckStep {
        kind: CheckKind::JsonSyntax,
        gate: FileCategory::StructuredData,
        blocking: true,
        scope: FileScope::Category,
        title: "Checking json syntax",
    },
    CheckStep {
        kind: CheckKind::Lint,
        gate: FileCategory::Code,
        blocking: true,
        scope: FileScope::Category,
        title: "Checking php syntax",
    },
    CheckStep {
        kind: CheckKind::StyleFix,
        gate: FileCategory::Code,
        blocking: false,
        scope: FileScope::Category,
        title: "Fixing code style",
    },
    CheckStep {
        kind: CheckKind::StyleCheck,
        gate: FileCategory::Code,
        blocking: true,
        scope: FileScope::Category,
        title: "Checking code style",
    },
    CheckStep {
        kind: CheckKind::MessDetection,
        gate: FileCategory::Code,
        blocking: true,
        scope: FileScope::Category,
        title: "Checking code mess",
    },
    CheckStep {
        kind: CheckKind::UnitTests,
        gate: FileCategory::Code,
        blocking: true,
        scope: FileScope::Project,
        title: "Running unit tests",
    },
];

/// Steps whose gate category is present, in table order
pub fn steps_for(flags: CategoryFlags) -> Vec<&'static CheckStep> {
    CHECK_STEPS
        .iter()
        .filter(|step| flags.contains(step.gate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classify::classify;

    fn kinds(steps: &[&CheckStep]) -> Vec<CheckKind> {
        steps.iter().map(|step| step.kind).collect()
    }

    #[test]
    fn test_every_kind_appears_once() {
        for kind in [
            CheckKind::Manifest,
            CheckKind::JsonSyntax,
            CheckKind::Lint,
            CheckKind::StyleFix,
            CheckKind::StyleCheck,
            CheckKind::MessDetection,
            CheckKind::UnitTests,
        ] {
            let count = CHECK_STEPS.iter().filter(|step| step.kind == kind).count();
            assert_eq!(count, 1, "{kind} must appear exactly once");
        }
    }

    #[test]
    fn test_no_categories_no_steps() {
        assert!(steps_for(CategoryFlags::empty()).is_empty());
    }

    #[test]
    fn test_code_chain_order() {
        let steps = steps_for(classify(["src/Foo.php"]));
        assert_eq!(
            kinds(&steps),
            vec![
                CheckKind::Lint,
                CheckKind::StyleFix,
                CheckKind::StyleCheck,
                CheckKind::MessDetection,
                CheckKind::UnitTests,
            ]
        );
    }

    #[test]
    fn test_full_order() {
        let steps = steps_for(classify(["composer.json", "composer.lock", "src/Foo.php"]));
        assert_eq!(
            kinds(&steps),
            vec![
                CheckKind::Manifest,
                CheckKind::JsonSyntax,
                CheckKind::Lint,
                CheckKind::StyleFix,
                CheckKind::StyleCheck,
                CheckKind::MessDetection,
                CheckKind::UnitTests,
            ]
        );
    }

    #[test]
    fn test_json_only_never_reaches_unit_tests() {
        let steps = steps_for(classify(["fixtures/data.json"]));
        assert_eq!(kinds(&steps), vec![CheckKind::JsonSyntax]);
    }

    #[test]
    fn test_only_style_fix_is_non_blocking() {
        let non_blocking: Vec<_> = CHECK_STEPS
            .iter()
            .filter(|step| !step.blocking)
            .map(|step| step.kind)
            .collect();
        assert_eq!(non_blocking, vec![CheckKind::StyleFix]);
    }
}
