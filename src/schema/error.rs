//! Schema error types.

use thiserror::Error;

/// Errors that can occur when interpreting raw cartridge data as a state table.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The cartridge value is not a mapping of state definitions.
    #[error("cartridge does not describe a mapping of state definitions")]
    InvalidShape(#[source] serde_yaml::Error),
}
