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

//! Send `log` crate records through tracing-log to the collector named by `LOGENTRIES_ENDPOINT`,
//! tagged with the token in `LOGENTRIES_TOKEN`.

use tracing_logentries::{formatter::Renderer, json::JsonRenderer, layer::Layer};
use tracing_subscriber::{
    layer::SubscriberExt, // Needed to get `with()`
    registry::Registry,
};

pub fn main() {
    tracing_log::LogTracer::init().unwrap();

    let mut layer = Layer::from_env().unwrap();
    layer.set_formatter(Renderer::Json(JsonRenderer::default()));
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber).unwrap();

    log::debug!("你好, log crate.");
    log::info!("你好, log crate.");
    log::warn!("你好, log crate.");
    log::error!("你好, log crate.");
}
