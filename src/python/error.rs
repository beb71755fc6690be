//! Python cartridge scanning errors.

use thiserror::Error;

/// Errors produced while scanning a Python cartridge source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PythonError {
    /// The source could not be read as a literal-only cartridge.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}
