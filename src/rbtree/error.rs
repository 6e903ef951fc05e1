use std::error;
use std::fmt;

/// Why a `Position` could not be used against a map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The position was taken from a different map
    ForeignPosition,
    /// The entry it pointed at has been erased since
    StalePosition,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ForeignPosition => write!(f, "position belongs to another map"),
            Error::StalePosition => write!(f, "position refers to an erased entry"),
        }
    }
}

impl error::Error for Error {}
