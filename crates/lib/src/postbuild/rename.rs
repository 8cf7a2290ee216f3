use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::ARTIFACT_EXTENSION;
use crate::discover::{DiscoverError, FileClassifier};

#[derive(Debug, Error)]
pub enum RenameError {
  #[error(transparent)]
  Discover(#[from] DiscoverError),

  #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
  Rename {
    from: PathBuf,
    to: PathBuf,
    source: std::io::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
  pub from: PathBuf,
  pub to: PathBuf,
}

/// Canonical name for a tagged artifact, or `None` if `file_name` needs no rename.
///
/// `mod.cpython-39-darwin.so` becomes `mod.so`. Only extension-module tags
/// (`cpython-*`, `pypy*-*`, `abi3`) are stripped; `mod.so` and dotted library
/// names such as `libpython3.9.so` are left alone.
pub fn canonical_artifact_name(file_name: &str) -> Option<String> {
  let stem = file_name.strip_suffix(ARTIFACT_EXTENSION)?.strip_suffix('.')?;
  let (base, tag) = stem.split_once('.')?;
  if base.is_empty() || !is_extension_tag(tag) {
    return None;
  }
  Some(format!("{}.{}", base, ARTIFACT_EXTENSION))
}

fn is_extension_tag(tag: &str) -> bool {
  tag == "abi3" || tag.starts_with("cpython-") || (tag.starts_with("pypy") && tag.contains('-'))
}

/// Rename every tagged artifact under `build_dir` to its canonical name.
///
/// The build tree is walked with the same exclusion rules as discovery. Paths in
/// `copied` were placed by the copy step and keep their names.
pub fn normalize_artifacts(
  build_dir: &Path,
  classifier: &FileClassifier,
  copied: &HashSet<PathBuf>,
) -> Result<Vec<RenamePlan>, RenameError> {
  let mut renamed = Vec::new();

  for from in classifier.discover(build_dir)? {
    if copied.contains(&from) {
      continue;
    }
    let Some(name) = from.file_name().and_then(|n| n.to_str()) else {
      continue;
    };
    let Some(canonical) = canonical_artifact_name(name) else {
      continue;
    };
    let to = from.with_file_name(canonical);
    fs::rename(&from, &to).map_err(|e| RenameError::Rename {
      from: from.clone(),
      to: to.clone(),
      source: e,
    })?;
    debug!(from = %from.display(), to = %to.display(), "renamed artifact");
    renamed.push(RenamePlan { from, to });
  }

  info!(count = renamed.len(), "artifacts normalized");
  Ok(renamed)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn strips_platform_tags() {
    assert_eq!(canonical_artifact_name("mod.cpython-39-darwin.so").as_deref(), Some("mod.so"));
    assert_eq!(
      canonical_artifact_name("views.cpython-311-x86_64-linux-gnu.so").as_deref(),
      Some("views.so")
    );
    assert_eq!(canonical_artifact_name("fast.abi3.so").as_deref(), Some("fast.so"));
  }

  #[test]
  fn leaves_canonical_and_foreign_names_alone() {
    assert_eq!(canonical_artifact_name("mod.so"), None);
    assert_eq!(canonical_artifact_name("README.md"), None);
    assert_eq!(canonical_artifact_name("libfoo.so.1"), None);
    assert_eq!(canonical_artifact_name(".hidden.so"), None);
    assert_eq!(canonical_artifact_name("libpython3.9.so"), None);
    assert_eq!(canonical_artifact_name("foo.bar.so"), None);
    assert_eq!(canonical_artifact_name("mod.cpython.so"), None);
    assert_eq!(canonical_artifact_name("also"), None);
  }

  #[test]
  fn canonical_name_is_fixed_point() {
    for name in ["mod.cpython-39-darwin.so", "pkg.pypy39-pp73-x86_64-linux-gnu.so"] {
      let once = canonical_artifact_name(name).unwrap();
      assert_eq!(canonical_artifact_name(&once), None);
    }
  }

  #[test]
  fn renames_nested_artifacts_in_place() {
    let temp = TempDir::new().unwrap();
    let build = temp.path().join("build");
    fs::create_dir_all(build.join("app").join("api")).unwrap();
    fs::write(build.join("mod.cpython-39-darwin.so"), "elf").unwrap();
    fs::write(build.join("app").join("api").join("views.cpython-39-darwin.so"), "elf").unwrap();
    fs::write(build.join("app").join("done.so"), "elf").unwrap();

    let renamed = normalize_artifacts(&build, &FileClassifier::default(), &HashSet::new()).unwrap();

    assert_eq!(renamed.len(), 2);
    assert!(build.join("mod.so").exists());
    assert!(!build.join("mod.cpython-39-darwin.so").exists());
    assert!(build.join("app").join("api").join("views.so").exists());
    assert!(build.join("app").join("done.so").exists());
  }

  #[test]
  fn copied_files_keep_their_names() {
    let temp = TempDir::new().unwrap();
    let vendored = temp.path().join("vendor").join("_speedups.cpython-39-darwin.so");
    fs::create_dir_all(vendored.parent().unwrap()).unwrap();
    fs::write(&vendored, "prebuilt").unwrap();
    fs::write(temp.path().join("mod.cpython-39-darwin.so"), "elf").unwrap();
    let copied = HashSet::from([vendored.clone()]);

    let renamed = normalize_artifacts(temp.path(), &FileClassifier::default(), &copied).unwrap();

    assert_eq!(renamed.len(), 1);
    assert!(vendored.exists());
    assert!(temp.path().join("mod.so").exists());
  }

  #[test]
  fn second_pass_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("mod.cpython-39-darwin.so"), "elf").unwrap();
    let classifier = FileClassifier::default();

    normalize_artifacts(temp.path(), &classifier, &HashSet::new()).unwrap();
    let second = normalize_artifacts(temp.path(), &classifier, &HashSet::new()).unwrap();

    assert!(second.is_empty());
    assert!(temp.path().join("mod.so").exists());
  }
}
