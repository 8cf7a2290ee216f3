//! Build configuration.
//!
//! A [`BuildConfig`] is assembled once from user-facing [`BuildOptions`] and is
//! never mutated afterwards. All validation happens here, before anything on
//! disk is touched.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::{BUILD_DIR_NAME, DEFAULT_PYTHON, PACKAGE_MARKER, TMP_DIR_NAME};

/// Errors raised while validating build options.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("unsupported language level {0}: expected 2 or 3")]
  UnsupportedLanguage(u8),

  #[error("the file to compile should not be a directory: {}", path.display())]
  FileIsDirectory { path: PathBuf },

  #[error("the file to compile does not exist: {}", path.display())]
  FileNotFound { path: PathBuf },

  #[error("failed to canonicalize package root {}: {source}", path.display())]
  Canonicalize { path: PathBuf, source: std::io::Error },
}

/// Source language dialect forwarded to the compiler as `language_level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Language {
  Py2,
  #[default]
  Py3,
}

impl Language {
  pub fn level(self) -> u8 {
    match self {
      Language::Py2 => 2,
      Language::Py3 => 3,
    }
  }
}

impl TryFrom<u8> for Language {
  type Error = ConfigError;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      2 => Ok(Language::Py2),
      3 => Ok(Language::Py3),
      other => Err(ConfigError::UnsupportedLanguage(other)),
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.level())
  }
}

/// Settings for the external compiler toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  /// Interpreter used to drive Cython and the C build.
  pub python: String,
  /// Extra arguments appended to every extension's link line.
  pub link_args: Vec<String>,
}

impl Default for Toolchain {
  /// `python3` with no extra link arguments.
  fn default() -> Self {
    Self {
      python: DEFAULT_PYTHON.to_string(),
      link_args: Vec::new(),
    }
  }
}

/// Raw options as supplied by the caller.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Project root, used when no single file is given.
  pub root: PathBuf,
  pub language: Language,
  /// Restrict the run to this one file.
  pub file: Option<PathBuf>,
  pub toolchain: Toolchain,
}

impl BuildOptions {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      language: Language::default(),
      file: None,
      toolchain: Toolchain::default(),
    }
  }
}

/// What the run compiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
  /// Every eligible file under the package root.
  Project,
  /// Exactly one file.
  SingleFile(PathBuf),
}

/// Validated, immutable configuration for one build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  mode: BuildMode,
  package_root: PathBuf,
  package_name: Option<String>,
  build_dir: PathBuf,
  tmp_dir: PathBuf,
  language: Language,
  toolchain: Toolchain,
}

impl BuildConfig {
  /// Validate `options` and derive every path the run will use.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::FileIsDirectory`] or [`ConfigError::FileNotFound`]
  /// when a single-file target is unusable.
  pub fn new(options: BuildOptions) -> Result<Self, ConfigError> {
    let (mode, package_root) = match options.file {
      Some(file) => {
        if file.is_dir() {
          return Err(ConfigError::FileIsDirectory { path: file });
        }
        if !file.exists() {
          return Err(ConfigError::FileNotFound { path: file });
        }
        let package_root = match file.parent() {
          Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
          _ => PathBuf::from("."),
        };
        // Keep the file addressed through its package root so relative paths strip cleanly.
        let file = match file.file_name() {
          Some(name) => package_root.join(name),
          None => file,
        };
        (BuildMode::SingleFile(file), package_root)
      }
      None => (BuildMode::Project, options.root),
    };

    let package_name = detect_package(&package_root)?;
    let build_dir = package_root.join(BUILD_DIR_NAME);
    let tmp_dir = build_dir.join(TMP_DIR_NAME);

    debug!(
      mode = ?mode,
      package_root = %package_root.display(),
      package = ?package_name,
      language = %options.language,
      "build configuration resolved"
    );

    Ok(Self {
      mode,
      package_root,
      package_name,
      build_dir,
      tmp_dir,
      language: options.language,
      toolchain: options.toolchain,
    })
  }

  pub fn mode(&self) -> &BuildMode {
    &self.mode
  }

  pub fn package_root(&self) -> &Path {
    &self.package_root
  }

  /// Name of the enclosing package when the root carries a package marker.
  pub fn package_name(&self) -> Option<&str> {
    self.package_name.as_deref()
  }

  pub fn build_dir(&self) -> &Path {
    &self.build_dir
  }

  pub fn tmp_dir(&self) -> &Path {
    &self.tmp_dir
  }

  pub fn language(&self) -> Language {
    self.language
  }

  pub fn toolchain(&self) -> &Toolchain {
    &self.toolchain
  }
}

/// Return the package directory name if `root` contains a package marker.
fn detect_package(root: &Path) -> Result<Option<String>, ConfigError> {
  if !root.join(PACKAGE_MARKER).is_file() {
    return Ok(None);
  }
  let canonical = dunce::canonicalize(root).map_err(|e| ConfigError::Canonicalize {
    path: root.to_path_buf(),
    source: e,
  })?;
  Ok(canonical.file_name().map(|n| n.to_string_lossy().into_owned()))
}
