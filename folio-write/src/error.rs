//! Error types for document assembly.

use crate::ObjectId;
use core::fmt;

/// The main error type for assembling a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An object identifier outside the range handed out by the builder.
    InvalidReference(ObjectId),
    /// The document was built before a root object was designated.
    MissingRoot,
    /// The document was built while a reserved slot was still empty.
    IncompleteObject(ObjectId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReference(id) => write!(f, "object {} is out of range", id.get()),
            Self::MissingRoot => write!(f, "no root object was set"),
            Self::IncompleteObject(id) => {
                write!(f, "object {} was reserved but never set", id.get())
            }
        }
    }
}

impl core::error::Error for Error {}

/// Result type for document assembly operations.
pub type Result<T> = core::result::Result<T, Error>;
