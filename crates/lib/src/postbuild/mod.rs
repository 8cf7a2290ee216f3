//! Post-compile processing of the build tree.
//!
//! Three ordered passes, each covering the whole batch before the next starts:
//! 1. [`clean_intermediates`] removes the tmp object tree and generated `.c` files
//! 2. [`copy_resources`] mirrors pass-through files into the build tree
//! 3. [`normalize_artifacts`] strips platform tags from compiled module names

mod clean;
mod copy;
mod rename;

pub use clean::{CleanupError, clean_intermediates, intermediate_path};
pub use copy::{CopyError, copy_resources};
pub use rename::{RenameError, RenamePlan, canonical_artifact_name, normalize_artifacts};
