use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::INTERMEDIATE_EXTENSION;

/// A missing intermediate means the compiler did not behave as expected, so
/// every variant here is fatal.
#[derive(Debug, Error)]
pub enum CleanupError {
  #[error("tmp directory missing after compile: {}", path.display())]
  MissingTmpDir { path: PathBuf },

  #[error("intermediate file missing after compile: {}", path.display())]
  MissingIntermediate { path: PathBuf },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: std::io::Error },
}

/// Generated C file for `module`: same path, extension swapped.
pub fn intermediate_path(module: &Path) -> PathBuf {
  module.with_extension(INTERMEDIATE_EXTENSION)
}

/// Delete the tmp directory tree and the generated C file of every module.
///
/// Returns the number of intermediate files removed.
pub fn clean_intermediates(tmp_dir: &Path, modules: &[PathBuf]) -> Result<usize, CleanupError> {
  if !tmp_dir.is_dir() {
    return Err(CleanupError::MissingTmpDir {
      path: tmp_dir.to_path_buf(),
    });
  }
  fs::remove_dir_all(tmp_dir).map_err(|e| CleanupError::Remove {
    path: tmp_dir.to_path_buf(),
    source: e,
  })?;
  debug!(path = %tmp_dir.display(), "removed tmp directory");

  for module in modules {
    let generated = intermediate_path(module);
    if !generated.is_file() {
      return Err(CleanupError::MissingIntermediate { path: generated });
    }
    fs::remove_file(&generated).map_err(|e| CleanupError::Remove {
      path: generated.clone(),
      source: e,
    })?;
    debug!(path = %generated.display(), "removed intermediate");
  }

  info!(count = modules.len(), "intermediates cleaned");
  Ok(modules.len())
}
