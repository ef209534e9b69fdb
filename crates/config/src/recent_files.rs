//! Most-recently-opened documents, newest first

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentFiles {
    paths: Vec<PathBuf>,
}

impl RecentFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Move `path` to the front, dropping the oldest entries past `limit`
    pub fn add(&mut self, path: &Path, limit: usize) {
        self.paths.retain(|p| p != path);
        self.paths.insert(0, path.to_path_buf());
        self.paths.truncate(limit);
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.paths.len();
        self.paths.retain(|p| p != path);
        self.paths.len() != before
    }

    /// Drop entries whose file no longer exists
    pub fn remove_missing(&mut self) -> usize {
        let before = self.paths.len();
        self.paths.retain(|p| p.exists());
        before - self.paths.len()
    }

    pub fn truncate(&mut self, limit: usize) {
        self.paths.truncate(limit);
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}
