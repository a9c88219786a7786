/*!
Specialized `Error` and `Result` types for dumptriage.
*/

use std::{convert, error, fmt, result, str};

/// Specialized `Error` type for dump decoding errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// Generic error type containing a string
    Other(&'static str),
    /// Unrecognized dump format.
    ///
    /// The buffer carries no known signature. Not fatal to a triage run;
    /// callers downgrade to format-independent extraction.
    UnrecognizedFormat,
    /// Truncated buffer.
    ///
    /// A declared field offset + width exceeds the buffer length. The payload
    /// names the field that could not be read.
    Truncated(&'static str),
    /// Out of bounds.
    ///
    /// Catch-all for bounds check errors.
    Bounds,
    /// Encoding error.
    ///
    /// Catch-all for string related errors such as invalid UTF-16 data.
    Encoding,
    /// The caller-imposed wall-clock deadline elapsed.
    Deadline,
}

/// Convert from &str to error
impl convert::From<&'static str> for Error {
    fn from(error: &'static str) -> Self {
        Error::Other(error)
    }
}

/// Convert from str::Utf8Error
impl From<str::Utf8Error> for Error {
    fn from(_err: str::Utf8Error) -> Self {
        Error::Encoding
    }
}

impl Error {
    /// Returns a tuple representing the error description and its string value.
    pub fn to_str_pair(self) -> (&'static str, Option<&'static str>) {
        match self {
            Error::Other(e) => ("other error", Some(e)),
            Error::UnrecognizedFormat => ("unrecognized dump format", None),
            Error::Truncated(field) => ("buffer too short for field", Some(field)),
            Error::Bounds => ("out of bounds", None),
            Error::Encoding => ("encoding error", None),
            Error::Deadline => ("processing deadline elapsed", None),
        }
    }

    /// Returns a simple string representation of the error.
    pub fn to_str(self) -> &'static str {
        self.to_str_pair().0
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (desc, value) = self.to_str_pair();

        if let Some(value) = value {
            write!(f, "{}: {}", desc, value)
        } else {
            f.write_str(desc)
        }
    }
}

impl error::Error for Error {
    fn description(&self) -> &str {
        self.to_str()
    }
}

/// Specialized `Result` type for dumptriage results.
pub type Result<T> = result::Result<T, Error>;
