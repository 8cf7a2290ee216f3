//! py2so-lib: compile a Python project into native extension modules.
//!
//! The pipeline turns a source tree into a build tree:
//! - `discover`: walk the root and split files into modules and resources
//! - `compile`: hand the modules to Cython in one blocking batch
//! - `postbuild`: drop intermediates, copy resources, normalize artifact names
//! - `pipeline`: sequence the stages for one `BuildConfig`

pub mod compile;
pub mod config;
pub mod consts;
pub mod discover;
pub mod layout;
pub mod pipeline;
pub mod postbuild;
pub mod util;
