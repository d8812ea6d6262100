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

//! The log record handed to renderers.
//!
//! A [`Record`] is a snapshot of a [`tracing`] [`Event`]: its severity, "message" field, the time
//! at which we saw it, its target, and any other fields, stringified. Renderers never see the
//! [`Event`] itself; that keeps them independent of [`tracing`]'s (explicitly unstable) internals
//! and lets callers build records by hand.
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
//! [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html

use crate::level::Severity;

use chrono::prelude::*;

/// One log entry
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub level: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub target: String,
    /// Structured fields other than "message", in the order they were recorded
    pub fields: Vec<(String, String)>,
}

impl Record {
    /// Construct a [`Record`] stamped with the current time
    pub fn new<S: Into<String>>(level: Severity, message: S) -> Record {
        Record {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            target: String::new(),
            fields: Vec::new(),
        }
    }
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Record {
        self.timestamp = timestamp;
        self
    }
    pub fn with_target<S: Into<String>>(mut self, target: S) -> Record {
        self.target = target.into();
        self
    }
    pub fn with_field<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Record {
        self.fields.push((key.into(), value.into()));
        self
    }
    /// Build a [`Record`] from a [`tracing`] event.
    ///
    /// `meta` is normally just `event.metadata()`, but the caller may substitute normalized
    /// metadata for events bridged from the `log` crate.
    ///
    /// [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
    pub fn from_event(event: &tracing::Event<'_>, meta: &tracing::Metadata<'_>) -> Record {
        let mut visitor = RecordVisitor {
            message: None,
            fields: Vec::new(),
        };
        event.record(&mut visitor);
        Record {
            level: Severity::from(meta.level()),
            message: visitor.message.unwrap_or_default(),
            timestamp: Utc::now(),
            target: meta.target().to_string(),
            fields: visitor.fields,
        }
    }
}

struct RecordVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl RecordVisitor {
    fn skip(field: &tracing::field::Field) -> bool {
        // tracing-log smuggles the `log` crate's metadata through fields of its own; they've been
        // folded back into the normalized metadata by the time we get here.
        cfg!(feature = "tracing-log") && field.name().starts_with("log.")
    }
}

impl tracing::field::Visit for RecordVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else if !Self::skip(field) {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        // The tracing macros take care to "pre-format" the `message` field so that `value`
        // actually refers to a `std::fmt::Arguments` instance, which will print to a debug format
        // without enclosing double-quotes.
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else if !Self::skip(field) {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }
}
