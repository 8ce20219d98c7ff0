//! Path classification
//!
//! Maps changed paths onto the file categories that gate the check pipeline.
//! Classification only looks at the path string, never at file contents, and a
//! single path may belong to several categories (`composer.json` is both a
//! dependency manifest and structured data).

use regex::Regex;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::LazyLock;

/// Kind of file a check cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileCategory {
    /// PHP sources
    Code,
    /// `composer.json` / `composer.lock` at the repository root
    DependencyManifest,
    /// Any JSON document
    StructuredData,
}

impl FileCategory {
    pub const ALL: [FileCategory; 3] = [
        FileCategory::Code,
        FileCategory::DependencyManifest,
        FileCategory::StructuredData,
    ];

    /// Test a single path against this category's pattern
    pub fn matches(self, path: &str) -> bool {
        pattern_for(self).is_match(path)
    }

    fn bit(self) -> u8 {
        match self {
            FileCategory::Code => 0b001,
            FileCategory::DependencyManifest => 0b010,
            FileCategory::StructuredData => 0b100,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileCategory::Code => "code",
            FileCategory::DependencyManifest => "dependency manifest",
            FileCategory::StructuredData => "structured data",
        };
        f.write_str(name)
    }
}

static CODE_FILES: LazyLock<Regex> = LazyLock::new(|| compile(r"^(.*)(\.php)$"));
static MANIFEST_FILES: LazyLock<Regex> = LazyLock::new(|| compile(r"^composer\.(json|lock)$"));
static DATA_FILES: LazyLock<Regex> = LazyLock::new(|| compile(r"^(.*)(\.json)$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid category pattern {pattern}: {e}"))
}

fn pattern_for(category: FileCategory) -> &'static Regex {
    match category {
        FileCategory::Code => &*CODE_FILES,
        FileCategory::DependencyManifest => &*MANIFEST_FILES,
        FileCategory::StructuredData => &*DATA_FILES,
    }
}

/// Set of categories present in a change set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CategoryFlags(u8);

impl CategoryFlags {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, category: FileCategory) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn insert(&mut self, category: FileCategory) {
        self.0 |= category.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Categories in declaration order
    pub fn iter(self) -> impl Iterator<Item = FileCategory> {
        FileCategory::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }
}

impl BitOr for CategoryFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CategoryFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<FileCategory> for CategoryFlags {
    fn from_iter<I: IntoIterator<Item = FileCategory>>(iter: I) -> Self {
        let mut flags = Self::empty();
        for category in iter {
            flags.insert(category);
        }
        flags
    }
}

/// Categories a single path belongs to
pub fn classify_path(path: &str) -> CategoryFlags {
    FileCategory::ALL
        .into_iter()
        .filter(|category| category.matches(path))
        .collect()
}

/// Union of the categories of every path
pub fn classify<I, S>(paths: I) -> CategoryFlags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paths
        .into_iter()
        .fold(CategoryFlags::empty(), |flags, path| {
            flags | classify_path(path.as_ref())
        })
}
