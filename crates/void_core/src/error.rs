//! Error types for the core library

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

/// The core error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A name failed validation
    Name(NameError),
    /// Generic error with message
    Message(Box<str>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Name(e) => write!(f, "Invalid name: {}", e),
            Error::Message(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias
pub type Result<T> = core::result::Result<T, Error>;

/// Reasons a [`NamedId`](crate::NamedId) can be rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The name was empty
    Empty,
    /// The name exceeded the maximum length
    TooLong { len: usize, max: usize },
    /// The name contained a character outside `[A-Za-z0-9_.:-]`
    InvalidChar { ch: char, position: usize },
    /// The name started or ended with the `:` namespace separator
    DanglingSeparator,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "name is empty"),
            NameError::TooLong { len, max } => {
                write!(f, "name is {} bytes long, maximum is {}", len, max)
            }
            NameError::InvalidChar { ch, position } => {
                write!(f, "invalid character {:?} at position {}", ch, position)
            }
            NameError::DanglingSeparator => {
                write!(f, "namespace separator ':' must be followed and preceded by a name")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NameError {}

impl From<NameError> for Error {
    fn from(e: NameError) -> Self {
        Error::Name(e)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Message(s.into())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Message(s.into_boxed_str())
    }
}
