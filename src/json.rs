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

//! JSON record rendering

use crate::{
    formatter::{format_timestamp, RecordFormatter},
    record::Record,
};

use serde_json::{Map, Value};

type StdResult<T, E> = std::result::Result<T, E>;

/// Renders each [`Record`] as a single JSON object with keys `level`, `msg` & `time`, plus one
/// key per field. A field that would collide with one of those three is renamed `fields.<name>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsonRenderer {
    /// Leave out the `time` key
    pub disable_timestamp: bool,
    /// strftime-style format for the `time` key; RFC 3339 if `None`
    pub timestamp_format: Option<String>,
    /// Indent the output. Note that this will produce a multi-line payload.
    pub pretty_print: bool,
}

impl RecordFormatter for JsonRenderer {
    fn format(
        &self,
        record: &Record,
    ) -> StdResult<String, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let mut map = Map::new();
        for (key, value) in &record.fields {
            let key = match key.as_str() {
                "level" | "msg" | "time" => format!("fields.{}", key),
                _ => key.clone(),
            };
            map.insert(key, Value::String(value.clone()));
        }
        if !self.disable_timestamp {
            map.insert(
                "time".to_string(),
                Value::String(format_timestamp(
                    &record.timestamp,
                    self.timestamp_format.as_deref(),
                )?),
            );
        }
        map.insert(
            "level".to_string(),
            Value::String(record.level.as_str().to_string()),
        );
        map.insert("msg".to_string(), Value::String(record.message.clone()));

        let obj = Value::Object(map);
        Ok(if self.pretty_print {
            serde_json::to_string_pretty(&obj)?
        } else {
            serde_json::to_string(&obj)?
        })
    }
}
