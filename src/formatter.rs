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

//! Record rendering primitives.
//!
//! This module defines the [`RecordFormatter`] trait, and the [`Renderer`] type that the
//! [`Layer`] stores & hands to [`Layer::fire`].
//!
//! [`Layer`]: crate::layer::Layer
//! [`Layer::fire`]: crate::layer::Layer::fire
//!
//! # Design
//!
//! The collector expects plain, uncolored text. Some renderers (well, one: [`TextRenderer`]) can
//! emit ANSI color escapes & so need to be told not to. Rather than inspect the type of a
//! renderer at runtime to find out whether it has such an option, [`Renderer`] is a closed
//! enumeration whose variants say so: only [`Renderer::Text`] carries a `disable_colors` flag.
//! Anything else is rendered as-is.

use crate::{
    error::{Error, Result},
    json::JsonRenderer,
    record::Record,
    text::TextRenderer,
};

use backtrace::Backtrace;
use chrono::{
    format::{Item, StrftimeItems},
    DateTime, SecondsFormat, Utc,
};

type StdResult<T, E> = std::result::Result<T, E>;

/// Operations all record formatters must support: turn a [`Record`] into a single line of text.
pub trait RecordFormatter {
    fn format(
        &self,
        record: &Record,
    ) -> StdResult<String, Box<dyn std::error::Error + Send + Sync + 'static>>;
}

/// A renderer, tagged by kind
pub enum Renderer {
    /// logfmt-style plain text; may be colorized
    Text(TextRenderer),
    /// one JSON object per record
    Json(JsonRenderer),
    /// anything else
    Custom(Box<dyn RecordFormatter + Send + Sync>),
}

impl Renderer {
    /// Does this renderer have a `disable_colors` option?
    pub fn supports_disable_colors(&self) -> bool {
        matches!(self, Renderer::Text(_))
    }
    /// Render `record`; failures are reported as [`Error::Render`].
    pub fn render(&self, record: &Record) -> Result<String> {
        let text = match self {
            Renderer::Text(r) => r.format(record),
            Renderer::Json(r) => r.format(record),
            Renderer::Custom(r) => r.format(record),
        };
        text.map_err(Error::render)
    }
}

impl std::default::Default for Renderer {
    /// The default renderer is colorless plain text.
    fn default() -> Self {
        Renderer::Text(TextRenderer::colorless())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Renderer::Text(r) => f.debug_tuple("Text").field(r).finish(),
            Renderer::Json(r) => f.debug_tuple("Json").field(r).finish(),
            Renderer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<TextRenderer> for Renderer {
    fn from(r: TextRenderer) -> Self {
        Renderer::Text(r)
    }
}

impl From<JsonRenderer> for Renderer {
    fn from(r: JsonRenderer) -> Self {
        Renderer::Json(r)
    }
}

/// The one colorless plain-text renderer every text-rendering [`Layer`] shares
///
/// [`Layer`]: crate::layer::Layer
static PLAIN_TEXT: TextRenderer = TextRenderer::colorless();

/// Render `record` as uncolored plain text with default settings.
pub fn render_plain(record: &Record) -> Result<String> {
    PLAIN_TEXT.format(record).map_err(Error::render)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                          timestamps                                            //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A user-supplied strftime-style timestamp format was malformed
pub struct BadTimestampFormat {
    pub format: String,
    pub back: Backtrace,
}

impl std::fmt::Display for BadTimestampFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Invalid timestamp format '{}'", self.format)
    }
}

impl std::fmt::Debug for BadTimestampFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}\n{:?}", self, self.back)
    }
}

impl std::error::Error for BadTimestampFormat {}

/// Format `ts` per `format`, or as RFC 3339 (to the second) if there isn't one.
pub(crate) fn format_timestamp(
    ts: &DateTime<Utc>,
    format: Option<&str>,
) -> StdResult<String, BadTimestampFormat> {
    match format {
        None => Ok(ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
        Some(fmt) => {
            // `DelayedFormat` reports a bad specifier only as a bare `fmt::Error` at display time,
            // so check up-front.
            if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
                return Err(BadTimestampFormat {
                    format: fmt.to_string(),
                    back: Backtrace::new(),
                });
            }
            Ok(ts.format(fmt).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::level::Severity;

    struct Fixed;
    impl RecordFormatter for Fixed {
        fn format(
            &self,
            record: &Record,
        ) -> StdResult<String, Box<dyn std::error::Error + Send + Sync + 'static>> {
            Ok(format!("<{}> {}", record.level, record.message))
        }
    }

    struct Broken;
    impl RecordFormatter for Broken {
        fn format(
            &self,
            _record: &Record,
        ) -> StdResult<String, Box<dyn std::error::Error + Send + Sync + 'static>> {
            Err("nope".into())
        }
    }

    #[test]
    fn capabilities() {
        assert!(Renderer::default().supports_disable_colors());
        assert!(Renderer::from(TextRenderer::default()).supports_disable_colors());
        assert!(!Renderer::from(JsonRenderer::default()).supports_disable_colors());
        assert!(!Renderer::Custom(Box::new(Fixed)).supports_disable_colors());
    }

    #[test]
    fn rendering() {
        let rec = Record::new(Severity::Error, "boom").with_timestamp(std::time::UNIX_EPOCH.into());
        assert_eq!(
            render_plain(&rec).unwrap(),
            "time=\"1970-01-01T00:00:00Z\" level=error msg=boom"
        );
        assert_eq!(
            Renderer::Custom(Box::new(Fixed)).render(&rec).unwrap(),
            "<error> boom"
        );
        assert!(matches!(
            Renderer::Custom(Box::new(Broken)).render(&rec),
            Err(Error::Render { .. })
        ));
    }

    #[test]
    fn timestamps() {
        let ts: DateTime<Utc> = std::time::UNIX_EPOCH.into();
        assert_eq!(format_timestamp(&ts, None).unwrap(), "1970-01-01T00:00:00Z");
        assert_eq!(
            format_timestamp(&ts, Some("%Y/%m/%d %H:%M")).unwrap(),
            "1970/01/01 00:00"
        );
        assert!(format_timestamp(&ts, Some("%Y %Q")).is_err());
    }
}
