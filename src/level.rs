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

//! Severity definitions.
//!
//! [`Severity`] names the levels a collector understands, from the most severe ("panic") to the
//! least ("debug"). [`tracing`] has no notion of "panic" or "fatal", and one more level of detail
//! than we do, so [`tracing::Level::TRACE`] is folded into [`Severity::Debug`].
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html

type StdResult<T, E> = std::result::Result<T, E>;

/// Log severities, ordered from most to least severe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// the process is about to unwind
    Panic,
    /// the process is about to exit
    Fatal,
    /// error conditions
    Error,
    /// warning conditions
    Warn,
    /// informational message
    Info,
    /// debug-level message
    Debug,
}

/// Every defined severity, most severe first.
pub const ALL_SEVERITIES: &[Severity] = &[
    Severity::Panic,
    Severity::Fatal,
    Severity::Error,
    Severity::Warn,
    Severity::Info,
    Severity::Debug,
];

impl Severity {
    /// Lower-case name, as it appears in a rendered line
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warn => "warning",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

impl std::convert::From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        match level {
            &tracing::Level::TRACE | &tracing::Level::DEBUG => Severity::Debug,
            &tracing::Level::INFO => Severity::Info,
            &tracing::Level::WARN => Severity::Warn,
            &tracing::Level::ERROR => Severity::Error,
        }
    }
}
