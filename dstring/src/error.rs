use darray::DArrayError;
use thiserror::Error;

/// Error types for `DString` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DStringError {
    /// The underlying byte array could not complete the operation
    #[error(transparent)]
    Array(#[from] DArrayError),
    /// A formatting trait implementation reported an error
    #[error("Formatting failed: a formatting trait implementation returned an error")]
    Format,
}

pub type Result<T> = core::result::Result<T, DStringError>;
