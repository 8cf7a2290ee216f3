use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::layout::CopyPlan;

#[derive(Debug, Error)]
pub enum CopyError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: std::io::Error,
  },
}

/// Copy every planned file, creating parent directories and overwriting existing files.
///
/// Returns the number of files copied.
pub fn copy_resources(plan: &[CopyPlan]) -> Result<usize, CopyError> {
  for entry in plan {
    if let Some(parent) = entry.destination.parent() {
      fs::create_dir_all(parent).map_err(|e| CopyError::CreateDir {
        path: parent.to_path_buf(),
        source: e,
      })?;
    }
    fs::copy(&entry.source, &entry.destination).map_err(|e| CopyError::Copy {
      from: entry.source.clone(),
      to: entry.destination.clone(),
      source: e,
    })?;
    debug!(from = %entry.source.display(), to = %entry.destination.display(), "copied");
  }

  info!(count = plan.len(), "resources copied");
  Ok(plan.len())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn copies_into_new_directories() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("static").join("logo.png");
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, [0x89, 0x50, 0x4e, 0x47]).unwrap();
    let destination = temp.path().join("build").join("static").join("logo.png");

    let copied = copy_resources(&[CopyPlan {
      source: source.clone(),
      destination: destination.clone(),
    }])
    .unwrap();

    assert_eq!(copied, 1);
    assert_eq!(fs::read(&destination).unwrap(), fs::read(&source).unwrap());
  }

  #[test]
  fn overwrites_existing_destination() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("settings.ini");
    fs::write(&source, "new").unwrap();
    let destination = temp.path().join("out").join("settings.ini");
    fs::create_dir_all(destination.parent().unwrap()).unwrap();
    fs::write(&destination, "stale contents").unwrap();

    copy_resources(&[CopyPlan {
      source,
      destination: destination.clone(),
    }])
    .unwrap();

    assert_eq!(fs::read_to_string(&destination).unwrap(), "new");
  }

  #[test]
  fn missing_source_is_an_error() {
    let temp = TempDir::new().unwrap();

    let err = copy_resources(&[CopyPlan {
      source: temp.path().join("gone.txt"),
      destination: temp.path().join("out").join("gone.txt"),
    }])
    .unwrap_err();

    assert!(matches!(err, CopyError::Copy { .. }));
  }
}
