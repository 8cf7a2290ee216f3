//! Test utilities for py2so-lib.
//!
//! In-process stand-ins for the external compiler that reproduce the shape of
//! what Cython leaves on disk.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compile::{CompileError, CompileRequest, Compiler};
use crate::postbuild::intermediate_path;

/// Platform tag used by [`FakeCompiler`] artifacts.
pub const FAKE_TAG: &str = "cpython-39-darwin";

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
  path
}

/// Emits a tagged artifact per module into the build dir, a `.c` file next to
/// each source and an object tree under the tmp dir.
#[derive(Debug, Default)]
pub struct FakeCompiler {
  /// Skip writing the generated `.c` files.
  pub skip_intermediates: bool,
  pub calls: RefCell<Vec<Vec<PathBuf>>>,
}

impl Compiler for FakeCompiler {
  fn compile(&self, request: &CompileRequest<'_>) -> Result<(), CompileError> {
    self.calls.borrow_mut().push(request.sources.to_vec());

    let obj_dir = request.tmp_dir.join("obj");
    fs::create_dir_all(&obj_dir).map_err(io_failure)?;

    for source in request.sources {
      let stem = source.file_stem().unwrap().to_string_lossy();
      fs::write(obj_dir.join(format!("{}.o", stem)), "obj").map_err(io_failure)?;
      fs::write(
        request.build_dir.join(format!("{}.{}.so", stem, FAKE_TAG)),
        format!("compiled {}", source.display()),
      )
      .map_err(io_failure)?;
      if !self.skip_intermediates {
        fs::write(intermediate_path(source), "/* generated */").map_err(io_failure)?;
      }
    }
    Ok(())
  }
}

fn io_failure(e: std::io::Error) -> CompileError {
  CompileError::Failed {
    code: None,
    stderr: e.to_string(),
  }
}

/// Always exits non-zero after leaving partial output behind.
#[derive(Debug, Default)]
pub struct FailingCompiler;

impl Compiler for FailingCompiler {
  fn compile(&self, request: &CompileRequest<'_>) -> Result<(), CompileError> {
    fs::create_dir_all(request.tmp_dir).map_err(io_failure)?;
    Err(CompileError::Failed {
      code: Some(1),
      stderr: "error: command 'gcc' failed with exit status 1".to_string(),
    })
  }
}
