//! Implementation of the build run.
//!
//! Compiles every eligible module under the current directory (or a single
//! file) into `build/`, copying everything else alongside.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use py2so_lib::config::{BuildOptions, Language, Toolchain};
use py2so_lib::consts::{DEFAULT_PYTHON, PYTHON_ENV};
use py2so_lib::pipeline::build;

use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success};

#[derive(Args, Debug)]
pub struct BuildArgs {
  /// Python language level passed to Cython (2 or 3)
  #[arg(short, long, default_value_t = 3)]
  pub language: u8,

  /// Compile only this file instead of the whole project
  #[arg(short, long)]
  pub file: Option<PathBuf>,

  /// Python interpreter that runs Cython
  #[arg(long, env = PYTHON_ENV, default_value = DEFAULT_PYTHON)]
  pub python: String,

  /// Extra linker argument, repeatable (e.g. --link-arg=-framework --link-arg=OpenGL)
  #[arg(long = "link-arg", value_name = "ARG", allow_hyphen_values = true)]
  pub link_args: Vec<String>,
}

impl BuildArgs {
  fn into_options(self) -> Result<BuildOptions> {
    let language = Language::try_from(self.language)?;

    let toolchain = Toolchain {
      python: self.python,
      link_args: self.link_args,
    };

    Ok(BuildOptions {
      root: PathBuf::from("."),
      language,
      file: self.file,
      toolchain,
    })
  }
}

pub fn cmd_build(args: BuildArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let options = args.into_options().context("Invalid build options")?;
  debug!(?options, "build options");

  let summary = build(options).context("Build failed")?;

  if output.is_json() {
    print_json(&summary)?;
  } else {
    println!();
    if summary.compiled.is_empty() {
      print_info("No compilable modules found, resources copied only");
    }
    print_success("Build complete!");
    print_stat("Output", &summary.build_dir.display().to_string());
    print_stat("Modules compiled", &summary.compiled.len().to_string());
    print_stat("Resources copied", &summary.copied.to_string());
    print_stat("Artifacts renamed", &summary.renamed.len().to_string());
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}
