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

//! [tracing-logentries](crate) [`Layer`] implementation.
//!
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//!
//! The [`Layer`] struct holds an account token, a [`Renderer`] and a [`Transport`]. On each
//! event it renders a [`Record`] to a line of text, prefixes the token & a single space, and
//! sends the result as one datagram. Nothing is retried, buffered or batched.

use crate::{
    error::{Error, Result},
    formatter::{render_plain, Renderer},
    level::{Severity, ALL_SEVERITIES},
    record::Record,
    transport::{Transport, UdpTransport, LOGENTRIES_ENDPOINT},
};

use backtrace::Backtrace;
use tracing::Event;
use tracing_subscriber::layer::Context;

// When the tracing-log feature is enabled, use NormalizeEvent to extract file/line metadata
// from events that originated from the `log` crate. This follows the same pattern used by
// tracing-subscriber's fmt layer.
// See: https://github.com/tokio-rs/tracing/blob/master/tracing-subscriber/src/fmt/fmt_layer.rs
#[cfg(feature = "tracing-log")]
use tracing_log::NormalizeEvent;

/// Environment variable consulted by [`Layer::from_env`] for the account token
pub const TOKEN_VAR: &str = "LOGENTRIES_TOKEN";
/// Environment variable consulted by [`Layer::from_env`] for a non-default collector address
pub const ENDPOINT_VAR: &str = "LOGENTRIES_ENDPOINT";

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                          struct Layer                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A [`tracing-subscriber`]-compliant [`Layer`] implementation that will send [`Event`]s to a
/// Logentries collector.
///
/// [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
/// [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
/// [`Event`]: https://docs.rs/tracing/0.1.35/tracing/struct.Event.html
pub struct Layer<T: Transport = UdpTransport> {
    token: String,
    levels: &'static [Severity],
    renderer: Renderer,
    transport: T,
}

impl Layer<UdpTransport> {
    /// Attempt to construct a [`Layer`] that will send events tagged with `token` to the
    /// Logentries collector.
    ///
    /// This is the only place a socket is opened; if it fails, there is no [`Layer`].
    pub fn new<S: Into<String>>(token: S) -> Result<Self> {
        Layer::builder(token).build()
    }
    /// Start configuring a [`Layer`] that will tag events with `token`
    pub fn builder<S: Into<String>>(token: S) -> Builder {
        Builder {
            token: token.into(),
            endpoint: LOGENTRIES_ENDPOINT.to_string(),
            renderer: Renderer::default(),
        }
    }
    /// Attempt to construct a [`Layer`] with the token named by `LOGENTRIES_TOKEN`. If
    /// `LOGENTRIES_ENDPOINT` is set, it overrides the collector address.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::NoToken {
                var: TOKEN_VAR,
                back: Backtrace::new(),
            })?;
        let mut builder = Layer::builder(token);
        if let Some(endpoint) = std::env::var(ENDPOINT_VAR).ok().filter(|e| !e.is_empty()) {
            builder = builder.endpoint(endpoint);
        }
        builder.build()
    }
}

impl<T: Transport> Layer<T> {
    /// Construct a [`Layer`] that will send via `transport`
    pub fn with_transport<S: Into<String>>(token: S, transport: T) -> Self {
        Layer {
            token: token.into(),
            levels: ALL_SEVERITIES,
            renderer: Renderer::default(),
            transport,
        }
    }
    pub fn token(&self) -> &str {
        &self.token
    }
    /// The severities for which this [`Layer`] wants events: all of them.
    pub fn levels(&self) -> &'static [Severity] {
        self.levels
    }
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
    pub fn transport(&self) -> &T {
        &self.transport
    }
    /// Replace this [`Layer`]'s renderer. Plain-text renderers will have colors disabled.
    pub fn set_formatter(&mut self, renderer: Renderer) {
        self.renderer = colorless(renderer);
    }
    /// Render `record` & send it, tagged with our token, as a single datagram.
    ///
    /// `active` is the renderer in effect for the caller. If it's a plain-text renderer, we
    /// render with [`render_plain`] instead, to be sure the collector gets no color escapes;
    /// `active` itself is never modified.
    ///
    /// Failures are reported on stderr as well as returned. Returns the number of bytes sent.
    pub fn fire(&self, record: &Record, active: &Renderer) -> Result<usize> {
        let rendered = if active.supports_disable_colors() {
            render_plain(record)
        } else {
            active.render(record)
        };
        let msg = rendered.map_err(|err| {
            eprintln!("{}", err);
            err
        })?;

        let payload = format!("{} {}", self.token, msg);
        let expected = payload.len();
        let written = self.transport.send(payload.as_bytes()).map_err(|err| {
            eprintln!("{}", err);
            err
        })?;
        if written < expected {
            let err = Error::Transmit {
                written,
                expected,
                source: None,
                back: Backtrace::new(),
            };
            eprintln!("{}", err);
            return Err(err);
        }
        Ok(written)
    }
}

fn colorless(renderer: Renderer) -> Renderer {
    match renderer {
        Renderer::Text(mut r) => {
            r.disable_colors = true;
            Renderer::Text(r)
        }
        r => r,
    }
}

/// Configuration for a [`Layer`] sending over UDP
pub struct Builder {
    token: String,
    endpoint: String,
    renderer: Renderer,
}

impl Builder {
    /// Send to `endpoint` (`host:port`) rather than the Logentries collector
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }
    /// Render with `renderer`; as with [`Layer::set_formatter`], plain-text renderers will have
    /// colors disabled.
    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = colorless(renderer);
        self
    }
    /// Open the socket & produce the [`Layer`]
    pub fn build(self) -> Result<Layer<UdpTransport>> {
        let transport = UdpTransport::new(self.endpoint.as_str())?;
        Ok(Layer {
            token: self.token,
            levels: ALL_SEVERITIES,
            renderer: self.renderer,
            transport,
        })
    }
}

/// The [`Layer`] implementation proper.
///
/// [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
impl<S, T> tracing_subscriber::layer::Layer<S> for Layer<T>
where
    S: tracing::Subscriber,
    T: Transport + 'static,
{
    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.levels.contains(&Severity::from(metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // For native tracing events, normalized_metadata() returns None and we use the event's
        // own metadata.
        #[cfg(feature = "tracing-log")]
        let normalized_meta = event.normalized_metadata();
        #[cfg(feature = "tracing-log")]
        let meta = normalized_meta.as_ref().unwrap_or_else(|| event.metadata());
        #[cfg(not(feature = "tracing-log"))]
        let meta = event.metadata();

        // `fire` has already complained on stderr; there's no one to hand the error to. Don't
        // be tempted to `tracing::error!` here: that would come right back to us.
        let _ = self.fire(&Record::from_event(event, meta), &self.renderer);
    }
}

#[cfg(test)]
mod smoke {

    use super::*;

    use crate::{
        formatter::RecordFormatter, json::JsonRenderer, text::TextRenderer,
    };

    use std::sync::{Arc, Mutex};

    type StdResult<T, E> = std::result::Result<T, E>;

    /// Records every datagram; optionally truncates the count it reports
    #[derive(Clone, Default)]
    struct Capture {
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
        short: Option<usize>,
    }

    impl Capture {
        fn sent(&self) -> Vec<Vec<u8>> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for Capture {
        fn send(&self, buf: &[u8]) -> Result<usize> {
            self.sent.lock().unwrap().push(buf.to_vec());
            Ok(self.short.unwrap_or(buf.len()))
        }
    }

    struct Refuse;

    impl Transport for Refuse {
        fn send(&self, buf: &[u8]) -> Result<usize> {
            Err(Error::Transmit {
                written: 0,
                expected: buf.len(),
                source: Some("connection refused".into()),
                back: Backtrace::new(),
            })
        }
    }

    /// Plain text without the timestamp
    struct Untimed;

    impl RecordFormatter for Untimed {
        fn format(
            &self,
            record: &Record,
        ) -> StdResult<String, Box<dyn std::error::Error + Send + Sync + 'static>> {
            TextRenderer {
                disable_timestamp: true,
                ..TextRenderer::colorless()
            }
            .format(record)
        }
    }

    struct Constant(&'static str);

    impl RecordFormatter for Constant {
        fn format(
            &self,
            _record: &Record,
        ) -> StdResult<String, Box<dyn std::error::Error + Send + Sync + 'static>> {
            Ok(self.0.to_string())
        }
    }

    fn epoch(level: Severity, msg: &str) -> Record {
        Record::new(level, msg).with_timestamp(std::time::UNIX_EPOCH.into())
    }

    #[test]
    fn payload_is_token_space_line() {
        let capture = Capture::default();
        let layer = Layer::with_transport("abc123", capture.clone());
        let active = Renderer::Custom(Box::new(Untimed));

        let n = layer.fire(&epoch(Severity::Info, "started"), &active).unwrap();

        assert_eq!(capture.sent(), vec![b"abc123 level=info msg=started".to_vec()]);
        assert_eq!(n, "abc123 level=info msg=started".len());
    }

    #[test]
    fn text_renderers_are_swapped_for_plain() {
        let capture = Capture::default();
        let layer = Layer::with_transport("abc123", capture.clone());
        let colored = TextRenderer {
            force_colors: true,
            disable_timestamp: true,
            ..TextRenderer::default()
        };
        let active = Renderer::Text(colored.clone());
        let rec = epoch(Severity::Info, "started");

        layer.fire(&rec, &active).unwrap();

        let sent = capture.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            std::str::from_utf8(&sent[0]).unwrap(),
            "abc123 time=\"1970-01-01T00:00:00Z\" level=info msg=started"
        );
        assert!(!sent[0].contains(&0x1b));
        // The caller's renderer is untouched
        assert!(matches!(&active, Renderer::Text(r) if *r == colored));

        // ...even on failure: an unusable timestamp format is never consulted, since the
        // plain renderer stands in for it.
        let broken = TextRenderer {
            timestamp_format: Some("%Q".to_string()),
            ..TextRenderer::default()
        };
        let active = Renderer::Text(broken.clone());
        assert!(layer.fire(&rec, &active).is_ok());
        assert!(matches!(&active, Renderer::Text(r) if *r == broken));
    }

    #[test]
    fn render_failure_sends_nothing() {
        let capture = Capture::default();
        let layer = Layer::with_transport("abc123", capture.clone());
        let active = Renderer::Json(JsonRenderer {
            timestamp_format: Some("%Q".to_string()),
            ..JsonRenderer::default()
        });

        let err = layer.fire(&epoch(Severity::Info, "x"), &active).unwrap_err();

        assert!(matches!(err, Error::Render { .. }));
        assert!(capture.sent().is_empty());
        assert!(matches!(&active, Renderer::Json(r) if r.timestamp_format.as_deref() == Some("%Q")));
    }

    #[test]
    fn short_write() {
        let capture = Capture {
            short: Some(5),
            ..Capture::default()
        };
        let layer = Layer::with_transport("abc123", capture.clone());
        // "abc123" + " " + 13 bytes == 20 bytes
        let active = Renderer::Custom(Box::new(Constant("0123456789abc")));

        let err = layer.fire(&epoch(Severity::Error, "x"), &active).unwrap_err();

        assert_eq!(err.bytes_written(), Some(5));
        assert!(matches!(
            err,
            Error::Transmit {
                written: 5,
                expected: 20,
                ..
            }
        ));
        // no retry
        assert_eq!(capture.sent().len(), 1);
    }

    #[test]
    fn transmit_failure() {
        let layer = Layer::with_transport("abc123", Refuse);
        let err = layer
            .fire(&epoch(Severity::Info, "x"), &Renderer::default())
            .unwrap_err();
        assert_eq!(err.bytes_written(), Some(0));
    }

    #[test]
    fn fire_is_not_deduplicated() {
        let capture = Capture::default();
        let layer = Layer::with_transport("abc123", capture.clone());
        let rec = epoch(Severity::Debug, "tick");
        layer.fire(&rec, layer.renderer()).unwrap();
        layer.fire(&rec.clone(), layer.renderer()).unwrap();
        let sent = capture.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
    }

    #[test]
    fn levels_and_formatters() {
        let mut layer = Layer::with_transport("abc123", Capture::default());
        assert_eq!(layer.token(), "abc123");
        for sev in ALL_SEVERITIES {
            assert!(layer.levels().contains(sev));
        }
        assert_eq!(layer.levels().len(), 6);

        layer.set_formatter(Renderer::Text(TextRenderer {
            force_colors: true,
            ..TextRenderer::default()
        }));
        assert!(matches!(layer.renderer(), Renderer::Text(r) if r.disable_colors && r.force_colors));

        let json = JsonRenderer {
            pretty_print: true,
            ..JsonRenderer::default()
        };
        layer.set_formatter(Renderer::Json(json.clone()));
        assert!(matches!(layer.renderer(), Renderer::Json(r) if *r == json));
    }

    #[test]
    fn unreachable_collector() {
        let res = Layer::builder("abc123")
            .endpoint("no-such-host.invalid:10000")
            .build();
        assert!(matches!(res, Err(Error::Connection { .. })));
    }

    use tracing::{debug, error, info, trace, warn};
    use tracing_subscriber::{
        layer::SubscriberExt, // Needed to get `with()`
        registry::Registry,
    };

    #[test]
    fn via_tracing() {
        let capture = Capture::default();
        let mut layer = Layer::with_transport("abc123", capture.clone());
        layer.set_formatter(Renderer::Custom(Box::new(Untimed)));
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            trace!("Hello, 世界!");
            debug!("Hello, 世界!");
            info!(port = 8080, "started");
            warn!(user = "bob", "Hello, 世界!");
            error!("Hello, 世界!");
        });

        let sent: Vec<String> = capture
            .sent()
            .into_iter()
            .map(|b| String::from_utf8(b).unwrap())
            .collect();
        assert_eq!(
            sent,
            vec![
                "abc123 level=debug msg=\"Hello, 世界!\"",
                "abc123 level=debug msg=\"Hello, 世界!\"",
                "abc123 level=info msg=started port=8080",
                "abc123 level=warning msg=\"Hello, 世界!\" user=bob",
                "abc123 level=error msg=\"Hello, 世界!\"",
            ]
        );
    }

    #[test]
    fn via_udp() {
        let collector = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        collector
            .set_read_timeout(Some(std::time::Duration::from_secs(5)))
            .unwrap();
        let endpoint = collector.local_addr().unwrap().to_string();

        // Exercise the environment-driven constructor, too. This is the only test that touches
        // these variables.
        std::env::remove_var(TOKEN_VAR);
        assert!(matches!(Layer::from_env(), Err(Error::NoToken { .. })));
        std::env::set_var(TOKEN_VAR, "abc123");
        std::env::set_var(ENDPOINT_VAR, &endpoint);
        let layer = Layer::from_env().unwrap();
        std::env::remove_var(TOKEN_VAR);
        std::env::remove_var(ENDPOINT_VAR);
        assert_eq!(
            layer.transport().peer_addr().unwrap(),
            collector.local_addr().unwrap()
        );

        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            info!(port = 8080, "started");
        });

        let mut buf = [0u8; 1024];
        let n = collector.recv(&mut buf).unwrap();
        let got = std::str::from_utf8(&buf[..n]).unwrap();
        assert!(got.starts_with("abc123 time=\""), "{}", got);
        assert!(got.ends_with(" level=info msg=started port=8080"), "{}", got);
    }
}
