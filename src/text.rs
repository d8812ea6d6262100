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

//! Plain-text record rendering
//!
//! [`TextRenderer`] produces logfmt-style lines:
//!
//! ```text
//! time="2022-06-23T16:10:55Z" level=info msg=started port=8080
//! ```
//!
//! Values are double-quoted (with Rust string escaping) whenever they contain anything other than
//! ASCII letters, digits, or one of `-._/@^+`. When colors are on the layout changes to something
//! easier on the eyes in a terminal:
//!
//! ```text
//! INFO[1970-01-01T00:00:00Z] started                                       port=8080
//! ```
//!
//! with the level & field names wrapped in ANSI color escapes.

use crate::{
    formatter::{format_timestamp, RecordFormatter},
    level::Severity,
    record::Record,
};

use std::fmt::Write;

type StdResult<T, E> = std::result::Result<T, E>;

const RED: u8 = 31;
const YELLOW: u8 = 33;
const BLUE: u8 = 36;
const GRAY: u8 = 37;

/// Renders [`Record`]s as `key=value` text
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextRenderer {
    /// Never emit color escapes, even if `force_colors` is set
    pub disable_colors: bool,
    /// Emit color escapes
    pub force_colors: bool,
    /// Leave out the `time` key
    pub disable_timestamp: bool,
    /// strftime-style format for the `time` key; RFC 3339 if `None`
    pub timestamp_format: Option<String>,
    /// Emit fields in the order they were recorded instead of sorted by key
    pub disable_sorting: bool,
}

impl TextRenderer {
    /// A renderer that will never colorize its output, with all other settings at their defaults
    pub const fn colorless() -> TextRenderer {
        TextRenderer {
            disable_colors: true,
            force_colors: false,
            disable_timestamp: false,
            timestamp_format: None,
            disable_sorting: false,
        }
    }
    pub fn colored(&self) -> bool {
        self.force_colors && !self.disable_colors
    }
    fn fields<'a>(&self, record: &'a Record) -> Vec<&'a (String, String)> {
        let mut fields: Vec<&(String, String)> = record.fields.iter().collect();
        if !self.disable_sorting {
            // stable, so repeated keys keep their relative order
            fields.sort_by(|a, b| a.0.cmp(&b.0));
        }
        fields
    }
    fn write_plain(
        &self,
        dst: &mut String,
        record: &Record,
        timestamp: Option<&str>,
    ) -> std::fmt::Result {
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(record.fields.len() + 3);
        if let Some(ts) = timestamp {
            pairs.push(("time", ts));
        }
        pairs.push(("level", record.level.as_str()));
        if !record.message.is_empty() {
            pairs.push(("msg", record.message.as_str()));
        }
        pairs.extend(
            self.fields(record)
                .into_iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        for (i, (key, value)) in pairs.into_iter().enumerate() {
            if i > 0 {
                dst.push(' ');
            }
            write!(dst, "{}=", key)?;
            append_value(dst, value)?;
        }
        Ok(())
    }
    fn write_colored(
        &self,
        dst: &mut String,
        record: &Record,
        timestamp: Option<&str>,
    ) -> std::fmt::Result {
        let color = level_color(record.level);
        // Level names are truncated to four characters so that messages line up
        let level: String = record.level.as_str().to_uppercase().chars().take(4).collect();
        match timestamp {
            Some(ts) => write!(
                dst,
                "\x1b[{}m{}\x1b[0m[{}] {:<44}",
                color, level, ts, record.message
            )?,
            None => write!(dst, "\x1b[{}m{}\x1b[0m {:<44}", color, level, record.message)?,
        }
        for (key, value) in self.fields(record) {
            write!(dst, " \x1b[{}m{}\x1b[0m=", color, key)?;
            append_value(dst, value)?;
        }
        Ok(())
    }
}

impl RecordFormatter for TextRenderer {
    fn format(
        &self,
        record: &Record,
    ) -> StdResult<String, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let timestamp = if self.disable_timestamp {
            None
        } else {
            Some(format_timestamp(
                &record.timestamp,
                self.timestamp_format.as_deref(),
            )?)
        };
        let mut line = String::new();
        if self.colored() {
            self.write_colored(&mut line, record, timestamp.as_deref())?;
        } else {
            self.write_plain(&mut line, record, timestamp.as_deref())?;
        }
        Ok(line)
    }
}

fn level_color(level: Severity) -> u8 {
    match level {
        Severity::Debug => GRAY,
        Severity::Warn => YELLOW,
        Severity::Error | Severity::Fatal | Severity::Panic => RED,
        Severity::Info => BLUE,
    }
}

fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || !text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

fn append_value(dst: &mut String, value: &str) -> std::fmt::Result {
    if needs_quoting(value) {
        write!(dst, "{:?}", value)
    } else {
        dst.push_str(value);
        Ok(())
    }
}
