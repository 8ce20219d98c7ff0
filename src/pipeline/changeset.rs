//! Changed files captured once per hook invocation

use super::classify::{CategoryFlags, FileCategory, classify};
use anyhow::Result;
use globset::GlobSet;
use std::collections::HashSet;

/// Anything that can list the paths touched by the git operation
pub trait ChangedFilesSource {
    /// Paths relative to the repository root
    fn changed_files(&self) -> Result<Vec<String>>;
}

impl ChangedFilesSource for Vec<String> {
    fn changed_files(&self) -> Result<Vec<String>> {
        Ok(self.clone())
    }
}

/// Immutable list of changed paths
///
/// Executors may rewrite files on disk during a run, but the set of paths is
/// never re-read: the same `ChangeSet` flows through every step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    files: Vec<String>,
}

impl ChangeSet {
    /// Build from a path list, dropping duplicates and keeping first-seen order
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let files = paths
            .into_iter()
            .map(Into::into)
            .filter(|path: &String| !path.is_empty() && seen.insert(path.clone()))
            .collect();
        Self { files }
    }

    /// Read the source exactly once, removing excluded paths
    pub fn capture<S>(source: &S, exclude: &GlobSet) -> Result<Self>
    where
        S: ChangedFilesSource + ?Sized,
    {
        let paths = source.changed_files()?;
        let total = paths.len();
        let change_set = Self::new(paths.into_iter().filter(|path| !exclude.is_match(path)));
        tracing::debug!(
            "Captured {} changed files ({} excluded)",
            change_set.len(),
            total.saturating_sub(change_set.len())
        );
        Ok(change_set)
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn categories(&self) -> CategoryFlags {
        classify(&self.files)
    }

    /// Files belonging to one category, in change-set order
    pub fn files_in(&self, category: FileCategory) -> Vec<String> {
        self.files
            .iter()
            .filter(|path| category.matches(path))
            .cloned()
            .collect()
    }
}
