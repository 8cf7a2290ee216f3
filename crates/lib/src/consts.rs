pub const APP_NAME: &str = "py2so";

/// Build output directory, relative to the package root.
pub const BUILD_DIR_NAME: &str = "build";

/// Intermediate object directory, relative to the build directory.
pub const TMP_DIR_NAME: &str = "tmp";

/// Source extensions handed to the compiler.
pub const SOURCE_EXTENSIONS: [&str; 2] = ["py", "pyx"];

/// Extension of the generated C file left next to each compiled module.
pub const INTERMEDIATE_EXTENSION: &str = "c";

/// Extension of compiled modules after name normalization.
pub const ARTIFACT_EXTENSION: &str = "so";

/// File whose presence marks a directory as a package.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// Base-name prefix reserved for package files that are never compiled standalone.
pub const RESERVED_PREFIX: &str = "__";

pub const DEFAULT_EXCLUDED_DIRS: [&str; 2] = [".git", "__pycache__"];

pub const DEFAULT_EXCLUDED_FILES: [&str; 3] = ["setup.py", "py2so.py", ".gitignore"];

pub const DEFAULT_NOT_COMPILED: [&str; 1] = ["gunicorn_config.py"];

pub const DEFAULT_PYTHON: &str = "python3";

/// Environment variable the CLI reads for the interpreter when `--python` is absent.
pub const PYTHON_ENV: &str = "PY2SO_PYTHON";
