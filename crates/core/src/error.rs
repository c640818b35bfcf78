//! Error types for the rill engine.

use core::fmt;

/// Result type alias for engine operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for engine operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Direct mutation attempted on a derived (read-only) view.
    ReadOnlyView {
        operator: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReadOnlyView { operator } => {
                write!(f, "direct mutation of read-only {} view", operator)
            }
        }
    }
}
