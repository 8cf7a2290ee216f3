//! File discovery and classification.
//!
//! Walks a package root, prunes excluded directories and files, and splits
//! what remains into modules to compile and resources to copy verbatim.
//! Classification looks only at names, never at file contents.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::consts::{
  DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_FILES, DEFAULT_NOT_COMPILED, RESERVED_PREFIX, SOURCE_EXTENSIONS,
};

#[derive(Debug, Error)]
pub enum DiscoverError {
  #[error("module path does not exist: {}", path.display())]
  RootNotFound { path: PathBuf },

  #[error("failed to walk {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },
}

/// Name-based exclusion rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionTables {
  /// Directory names that are never descended into.
  pub dirs: BTreeSet<String>,
  /// File names that are neither compiled nor copied.
  pub files: BTreeSet<String>,
  /// Source files that stay interpretable and are copied instead of compiled.
  pub not_compiled: BTreeSet<String>,
}

impl Default for ExclusionTables {
  fn default() -> Self {
    Self {
      dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
      files: DEFAULT_EXCLUDED_FILES.iter().map(|s| s.to_string()).collect(),
      not_compiled: DEFAULT_NOT_COMPILED.iter().map(|s| s.to_string()).collect(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
  Compilable,
  PassThrough,
}

/// Candidate files split by classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTree {
  pub compilable: Vec<PathBuf>,
  pub pass_through: Vec<PathBuf>,
}

impl SourceTree {
  pub fn len(&self) -> usize {
    self.compilable.len() + self.pass_through.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[derive(Debug, Clone, Default)]
pub struct FileClassifier {
  tables: ExclusionTables,
}

impl FileClassifier {
  pub fn new(tables: ExclusionTables) -> Self {
    Self { tables }
  }

  pub fn tables(&self) -> &ExclusionTables {
    &self.tables
  }

  /// List every candidate file under `root`, in a stable order.
  ///
  /// Excluded directories are pruned before descent, so nothing beneath them
  /// is ever visited.
  pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    if !root.exists() {
      return Err(DiscoverError::RootNotFound {
        path: root.to_path_buf(),
      });
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded_entry(entry));

    for entry in walker {
      let entry = entry.map_err(|e| DiscoverError::Walk {
        path: root.to_path_buf(),
        source: e,
      })?;
      if entry.file_type().is_dir() {
        continue;
      }
      trace!(path = %entry.path().display(), "discovered");
      files.push(entry.into_path());
    }

    debug!(root = %root.display(), count = files.len(), "discovery complete");
    Ok(files)
  }

  fn is_excluded_entry(&self, entry: &walkdir::DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
      self.tables.dirs.contains(name.as_ref())
    } else {
      self.tables.files.contains(name.as_ref())
    }
  }

  pub fn classify(&self, path: &Path) -> Classification {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
      return Classification::PassThrough;
    };
    let is_source = path
      .extension()
      .and_then(|e| e.to_str())
      .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));

    if is_source && !name.starts_with(RESERVED_PREFIX) && !self.tables.not_compiled.contains(name.as_ref()) {
      Classification::Compilable
    } else {
      Classification::PassThrough
    }
  }

  pub fn partition(&self, files: Vec<PathBuf>) -> SourceTree {
    let mut tree = SourceTree::default();
    for file in files {
      match self.classify(&file) {
        Classification::Compilable => tree.compilable.push(file),
        Classification::PassThrough => tree.pass_through.push(file),
      }
    }
    debug!(
      compilable = tree.compilable.len(),
      pass_through = tree.pass_through.len(),
      "classification complete"
    );
    tree
  }
}
