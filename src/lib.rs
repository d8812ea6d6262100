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

//! A [`tracing-subscriber`] [`Layer`] implementation for sending [`tracing`] [`Event`]s to
//! [Logentries] over UDP.
//!
//! [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//! [`tracing`]: https://docs.rs/tracing/0.1.35/tracing/index.html
//! [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
//! [Logentries]: https://docs.logentries.com/docs/input-token
//!
//! # Introduction
//!
//! Logentries' "token-based input" is about as simple as a log collector can get: send it a UDP
//! datagram whose first word is your account token, and the rest of the datagram is your log
//! line. This crate provides a [`Layer`] that does just that for each [`Event`]:
//!
//! 1. the [`Event`] is snapshotted into a [`Record`]
//! 2. the [`Record`] is rendered to a single line of text by a [`Renderer`]
//! 3. the token, a single space & that line are sent as one datagram
//!
//! [`Record`]: crate::record::Record
//! [`Renderer`]: crate::formatter::Renderer
//!
//! There is no retry, no buffering & no batching: if a datagram can't be sent the event is
//! dropped, and a complaint written to stderr.
//!
//! # Usage
//!
//! ```no_run
//! use tracing::info;
//! use tracing_logentries::layer::Layer;
//! use tracing_subscriber::registry::Registry;
//! use tracing_subscriber::layer::SubscriberExt; // Needed to get `with()`
//!
//! // Sends plain-text lines via UDP to data.logentries.com:10000
//! let subscriber = Registry::default().with(Layer::new("2bfbea1e-10c3-4419-bdad-7e6435882e1f").unwrap());
//! let _guard = tracing::subscriber::set_default(subscriber);
//!
//! info!(port = 8080, "started");
//! ```
//!
//! Will produce a datagram that looks something like this:
//!
//! ```text
//! 2bfbea1e-10c3-4419-bdad-7e6435882e1f time="2022-06-23T16:10:55Z" level=info msg=started port=8080
//! ```
//!
//! The collector address & the means of rendering are configurable:
//!
//! ```no_run
//! use tracing_logentries::{formatter::Renderer, json::JsonRenderer, layer::Layer};
//!
//! let layer = Layer::builder("2bfbea1e-10c3-4419-bdad-7e6435882e1f")
//!     .endpoint("some.other.host:10000")
//!     .renderer(Renderer::Json(JsonRenderer::default()))
//!     .build()
//!     .unwrap();
//! ```
//!
//! [`Layer::from_env`](crate::layer::Layer::from_env) will pick the token up from
//! `LOGENTRIES_TOKEN` (and optionally the address from `LOGENTRIES_ENDPOINT`).

pub mod error;
pub mod formatter;
pub mod json;
pub mod layer;
pub mod level;
pub mod record;
pub mod text;
pub mod transport;
