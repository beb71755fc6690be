//! Resolution error types.

use crate::python::PythonError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or reading a cartridge.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither `<name>.yaml` nor `<name>.py` exists in the base directory.
    #[error("cartridge `{name}` not found (tried `{name}.yaml` and `{name}.py`)")]
    NotFound { name: String },

    /// An explicitly named cartridge file does not exist.
    #[error("cartridge file `{path}` not found", path = .path.display())]
    FileNotFound { path: PathBuf },

    /// The cartridge file exists but could not be read.
    #[error("failed to read cartridge file `{path}`", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML.
    #[error("invalid YAML cartridge `{path}`", path = .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The file is not a literal-only Python cartridge.
    #[error("invalid Python cartridge `{path}`", path = .path.display())]
    Python {
        path: PathBuf,
        #[source]
        source: PythonError,
    },

    /// The Python file parsed cleanly but never binds `cartridge`.
    #[error("no `cartridge` binding in `{path}`", path = .path.display())]
    MissingBinding { path: PathBuf },
}
