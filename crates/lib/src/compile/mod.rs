//! External compiler boundary.
//!
//! The pipeline hands the whole batch of compilable modules to a [`Compiler`]
//! exactly once. A successful call leaves behind, for every module:
//! - a compiled artifact somewhere under the build directory
//! - a generated `.c` file next to the original source
//!
//! plus an object-file tree under the tmp directory.

mod cython;

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::Language;

pub use cython::{BUILD_EXT_SCRIPT, CythonCompiler};

#[derive(Debug, Error)]
pub enum CompileError {
  #[error("failed to launch compiler {program}: {source}")]
  Spawn { program: String, source: std::io::Error },

  #[error("compiler exited with code {code:?}: {stderr}")]
  Failed { code: Option<i32>, stderr: String },

  #[error("failed to encode compiler input: {0}")]
  Encode(#[from] serde_json::Error),
}

/// Everything the external compiler needs for one batch.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
  pub sources: &'a [PathBuf],
  pub language: Language,
  pub build_dir: &'a Path,
  pub tmp_dir: &'a Path,
  pub link_args: &'a [String],
}

impl CompileRequest<'_> {
  /// Cython compiler directives for this batch.
  pub fn directives(&self) -> Map<String, Value> {
    let mut directives = Map::new();
    directives.insert("always_allow_keywords".to_string(), Value::Bool(true));
    directives.insert("c_string_encoding".to_string(), Value::String("utf-8".to_string()));
    directives.insert("language_level".to_string(), Value::from(self.language.level()));
    directives
  }
}

/// Turns a batch of source modules into native extension modules.
///
/// Implementations block until the whole batch is done.
pub trait Compiler {
  fn compile(&self, request: &CompileRequest<'_>) -> Result<(), CompileError>;
}
