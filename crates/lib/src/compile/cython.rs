//! Cython + setuptools driven through a child interpreter process.

use std::process::Command;

use tracing::{debug, info};

use super::{CompileError, CompileRequest, Compiler};

/// Setup script run with `python -c`.
pub const BUILD_EXT_SCRIPT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/python/build_ext.py"));

const SOURCES_ENV: &str = "PY2SO_SOURCES";
const DIRECTIVES_ENV: &str = "PY2SO_DIRECTIVES";
const LINK_ARGS_ENV: &str = "PY2SO_LINK_ARGS";

#[derive(Debug, Clone)]
pub struct CythonCompiler {
  python: String,
}

impl CythonCompiler {
  pub fn new(python: impl Into<String>) -> Self {
    Self { python: python.into() }
  }

  pub fn python(&self) -> &str {
    &self.python
  }

  fn command(&self, request: &CompileRequest<'_>) -> Result<Command, CompileError> {
    let sources: Vec<String> = request
      .sources
      .iter()
      .map(|s| s.to_string_lossy().into_owned())
      .collect();

    let mut command = Command::new(&self.python);
    command
      .arg("-c")
      .arg(BUILD_EXT_SCRIPT)
      .arg("build_ext")
      .arg("-b")
      .arg(request.build_dir)
      .arg("-t")
      .arg(request.tmp_dir)
      .env(SOURCES_ENV, serde_json::to_string(&sources)?)
      .env(DIRECTIVES_ENV, serde_json::to_string(&request.directives())?)
      .env(LINK_ARGS_ENV, serde_json::to_string(request.link_args)?);
    Ok(command)
  }
}

impl Compiler for CythonCompiler {
  fn compile(&self, request: &CompileRequest<'_>) -> Result<(), CompileError> {
    info!(
      python = %self.python,
      modules = request.sources.len(),
      language = %request.language,
      "compiling modules"
    );

    let output = self
      .command(request)?
      .output()
      .map_err(|e| CompileError::Spawn {
        program: self.python.clone(),
        source: e,
      })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
      if !stdout.is_empty() {
        debug!(stdout = %stdout, "compiler stdout");
      }
      return Err(CompileError::Failed {
        code: output.status.code(),
        stderr: stderr.trim().to_string(),
      });
    }

    if !stdout.is_empty() {
      debug!(stdout = %stdout.trim(), "compiler output");
    }
    Ok(())
  }
}
