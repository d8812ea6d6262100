// Copyright (C) 2022-2025 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of tracing-logentries.
//
// tracing-logentries is free software: you can redistribute it and/or modify it under the terms of
// the GNU General Public License as published by the Free Software Foundation, either version 3 of
// the License, or (at your option) any later version.
//
// mpdpopm is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even
// the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details.
//
// You should have received a copy of the GNU General Public License along with mpdpopm.  If not,
// see <http://www.gnu.org/licenses/>.

//! [tracing-logentries](crate) errors

use backtrace::Backtrace;

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// [tracing-logentries](crate) error type
///
/// [tracing-logentries](crate) eschews libraries like [thiserror], [anyhow] & [Snafu] in favor of
/// a straightforward enumeration with a few match arms chosen on the basis what the caller will
/// need to repond. Every failure is local to the call that produced it; nothing here is retried.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
/// [Snafu]: https://docs.rs/snafu/latest/snafu
#[non_exhaustive]
pub enum Error {
    /// The datagram socket to the collector could not be established
    Connection { source: BoxedError, back: Backtrace },
    /// A log record could not be rendered to text
    Render { source: BoxedError, back: Backtrace },
    /// The datagram write failed, or wrote fewer than `expected` bytes
    Transmit {
        written: usize,
        expected: usize,
        source: Option<BoxedError>,
        back: Backtrace,
    },
    /// No account token was found in the environment
    NoToken { var: &'static str, back: Backtrace },
}

impl Error {
    pub(crate) fn connection<E: Into<BoxedError>>(err: E) -> Error {
        Error::Connection {
            source: err.into(),
            back: Backtrace::new(),
        }
    }
    pub(crate) fn render<E: Into<BoxedError>>(err: E) -> Error {
        Error::Render {
            source: err.into(),
            back: Backtrace::new(),
        }
    }
    /// The number of bytes that made it onto the wire before a transmit failure, if this is one
    pub fn bytes_written(&self) -> Option<usize> {
        match self {
            Error::Transmit { written, .. } => Some(*written),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Connection { source, .. } => {
                write!(f, "Unable to open a UDP socket to the collector: {}", source)
            }
            Error::Render { source, .. } => {
                write!(f, "Failed to generate string for entry: {}", source)
            }
            Error::Transmit {
                written,
                expected,
                source: Some(source),
                ..
            } => write!(
                f,
                "Unable to send log line via UDP. Wrote {} of {} bytes before error: {}",
                written, expected, source
            ),
            Error::Transmit {
                written, expected, ..
            } => write!(
                f,
                "Short write sending log line via UDP: wrote {} of {} bytes",
                written, expected
            ),
            Error::NoToken { var, .. } => {
                write!(f, "No Logentries token found (is {} set?)", var)
            }
            _ => write!(f, "Other tracing-logentries error"),
        }
    }
}

impl std::fmt::Debug for Error {
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Connection { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::Render { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::Transmit { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::NoToken { back, .. } => write!(f, "{}\n{:?}", self, back),
            err => write!(f, "tracing-logentries error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    #[allow(unreachable_patterns)]
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } | Error::Render { source, .. } => {
                Some(&**source as &(dyn std::error::Error + 'static))
            }
            Error::Transmit {
                source: Some(source),
                ..
            } => Some(&**source as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
