//! Destination planning for pass-through files.
//!
//! Resources keep their path relative to the package root. When the root is a
//! package, the compiler nests modules under the package name, so resources are
//! nested the same way to keep both trees congruent.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
  #[error("{} is not under package root {}", path.display(), root.display())]
  OutsideRoot { path: PathBuf, root: PathBuf },
}

/// A single file copy from the source tree into the build tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyPlan {
  pub source: PathBuf,
  pub destination: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LayoutPlanner {
  package_root: PathBuf,
  output_root: PathBuf,
}

impl LayoutPlanner {
  /// `package_name` is the detected package, if the root carries a package marker.
  pub fn new(package_root: &Path, build_dir: &Path, package_name: Option<&str>) -> Self {
    let output_root = match package_name {
      Some(name) => build_dir.join(name),
      None => build_dir.to_path_buf(),
    };
    Self {
      package_root: package_root.to_path_buf(),
      output_root,
    }
  }

  pub fn output_root(&self) -> &Path {
    &self.output_root
  }

  pub fn destination(&self, source: &Path) -> Result<PathBuf, LayoutError> {
    let relative = source
      .strip_prefix(&self.package_root)
      .map_err(|_| LayoutError::OutsideRoot {
        path: source.to_path_buf(),
        root: self.package_root.clone(),
      })?;
    Ok(self.output_root.join(relative))
  }

  pub fn plan(&self, files: &[PathBuf]) -> Result<Vec<CopyPlan>, LayoutError> {
    files
      .iter()
      .map(|source| {
        Ok(CopyPlan {
          source: source.clone(),
          destination: self.destination(source)?,
        })
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mirrors_relative_path_under_build_dir() {
    let planner = LayoutPlanner::new(Path::new("/src/app"), Path::new("/src/app/build"), None);

    let plan = planner
      .plan(&[
        PathBuf::from("/src/app/README.md"),
        PathBuf::from("/src/app/static/css/site.css"),
      ])
      .unwrap();

    assert_eq!(plan[0].destination, PathBuf::from("/src/app/build/README.md"));
    assert_eq!(plan[1].destination, PathBuf::from("/src/app/build/static/css/site.css"));
    assert_eq!(plan[1].source, PathBuf::from("/src/app/static/css/site.css"));
  }

  #[test]
  fn nests_under_package_name() {
    let planner = LayoutPlanner::new(Path::new("/src/app"), Path::new("/src/app/build"), Some("app"));

    let dest = planner.destination(Path::new("/src/app/templates/index.html")).unwrap();

    assert_eq!(dest, PathBuf::from("/src/app/build/app/templates/index.html"));
  }

  #[test]
  fn current_dir_root_strips_cleanly() {
    let planner = LayoutPlanner::new(Path::new("."), Path::new("./build"), None);

    let dest = planner.destination(Path::new("./gunicorn_config.py")).unwrap();

    assert_eq!(dest, PathBuf::from("./build/gunicorn_config.py"));
  }

  #[test]
  fn rejects_paths_outside_root() {
    let planner = LayoutPlanner::new(Path::new("/src/app"), Path::new("/src/app/build"), None);

    let err = planner.destination(Path::new("/etc/passwd")).unwrap_err();

    assert!(matches!(err, LayoutError::OutsideRoot { .. }));
  }
}
