//! Build orchestration.
//!
//! A [`Pipeline`] runs discovery and classification when it is constructed,
//! then [`Pipeline::run`] executes the remaining stages strictly in order:
//! compile, clean intermediates, copy resources, normalize artifact names.
//! The first error aborts the run and leaves the build tree as it is.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::compile::{CompileError, CompileRequest, Compiler, CythonCompiler};
use crate::config::{BuildConfig, BuildMode, BuildOptions, ConfigError, Language};
use crate::discover::{DiscoverError, FileClassifier, SourceTree};
use crate::layout::{LayoutError, LayoutPlanner};
use crate::postbuild::{
  CleanupError, CopyError, RenameError, RenamePlan, clean_intermediates, copy_resources, normalize_artifacts,
};

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("invalid configuration: {0}")]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Discover(#[from] DiscoverError),

  #[error(transparent)]
  Layout(#[from] LayoutError),

  #[error("compilation failed: {0}")]
  Compile(#[from] CompileError),

  #[error("cleanup failed: {0}")]
  Cleanup(#[from] CleanupError),

  #[error("copy failed: {0}")]
  Copy(#[from] CopyError),

  #[error("rename failed: {0}")]
  Rename(#[from] RenameError),
}

/// What a completed run did.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
  pub build_dir: PathBuf,
  pub language: Language,
  pub compiled: Vec<PathBuf>,
  pub copied: usize,
  pub intermediates_removed: usize,
  pub renamed: Vec<RenamePlan>,
}

pub struct Pipeline<C> {
  config: BuildConfig,
  classifier: FileClassifier,
  compiler: C,
  tree: SourceTree,
}

impl<C: Compiler> Pipeline<C> {
  /// Discover and classify the candidate files for `config`.
  ///
  /// In project mode the package root is walked recursively, skipping the
  /// build directory itself; in single-file mode the only candidate is the file.
  pub fn new(config: BuildConfig, classifier: FileClassifier, compiler: C) -> Result<Self, BuildError> {
    let candidates = match config.mode() {
      BuildMode::Project => {
        let mut files = classifier.discover(config.package_root())?;
        files.retain(|f| !f.starts_with(config.build_dir()));
        files
      }
      BuildMode::SingleFile(file) => vec![file.clone()],
    };
    let tree = classifier.partition(candidates);

    Ok(Self {
      config,
      classifier,
      compiler,
      tree,
    })
  }

  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  pub fn source_tree(&self) -> &SourceTree {
    &self.tree
  }

  pub fn run(&self) -> Result<BuildSummary, BuildError> {
    let config = &self.config;
    info!(
      root = %config.package_root().display(),
      build_dir = %config.build_dir().display(),
      modules = self.tree.compilable.len(),
      resources = self.tree.pass_through.len(),
      "starting build"
    );

    let mut intermediates_removed = 0;
    if self.tree.compilable.is_empty() {
      info!("no compilable modules, skipping compile");
    } else {
      let request = CompileRequest {
        sources: &self.tree.compilable,
        language: config.language(),
        build_dir: config.build_dir(),
        tmp_dir: config.tmp_dir(),
        link_args: &config.toolchain().link_args,
      };
      self.compiler.compile(&request)?;
      intermediates_removed = clean_intermediates(config.tmp_dir(), &self.tree.compilable)?;
    }

    let planner = LayoutPlanner::new(config.package_root(), config.build_dir(), config.package_name());
    let plan = planner.plan(&self.tree.pass_through)?;
    let copied = copy_resources(&plan)?;

    let copied_paths: HashSet<PathBuf> = plan.into_iter().map(|entry| entry.destination).collect();
    let renamed = if config.build_dir().is_dir() {
      normalize_artifacts(config.build_dir(), &self.classifier, &copied_paths)?
    } else {
      debug!("build directory absent, nothing to rename");
      Vec::new()
    };

    info!(
      compiled = self.tree.compilable.len(),
      copied,
      renamed = renamed.len(),
      "build complete"
    );

    Ok(BuildSummary {
      build_dir: config.build_dir().to_path_buf(),
      language: config.language(),
      compiled: self.tree.compilable.clone(),
      copied,
      intermediates_removed,
      renamed,
    })
  }
}

/// Validate `options` and run a full build with Cython and the default exclusion tables.
pub fn build(options: BuildOptions) -> Result<BuildSummary, BuildError> {
  let config = BuildConfig::new(options)?;
  let compiler = CythonCompiler::new(config.toolchain().python.clone());
  Pipeline::new(config, FileClassifier::default(), compiler)?.run()
}
