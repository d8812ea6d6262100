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

//! The transport layer.
//!
//! This module defines the [`Transport`] trait that all implementations must support, as well
//! as the UDP implementation the collector speaks.
//!
//! # Examples
//!
//! To send datagrams to the Logentries collector:
//!
//! ```no_run
//! use tracing_logentries::transport::UdpTransport;
//! let transpo = UdpTransport::logentries().unwrap();
//! ```
//!
//! To some other host:
//!
//! ```rust
//! use tracing_logentries::transport::UdpTransport;
//! let transpo = UdpTransport::new("some-host.invalid:10000");
//! assert!(transpo.is_err()); // no such host, after all
//! ```

use crate::error::{Error, Result};

use backtrace::Backtrace;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

/// The Logentries UDP collector
pub const LOGENTRIES_ENDPOINT: &str = "data.logentries.com:10000";

/// Operations all transport layers must support.
pub trait Transport {
    /// Send `buf` as a single message, returning the number of bytes written.
    ///
    /// Implementations must not retry, and must not split `buf` across messages; a short write is
    /// reported as such & the caller decides what to make of it.
    fn send(&self, buf: &[u8]) -> Result<usize>;
}

/// Sending log lines via UDP datagrams.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Construct a [`Transport`] implementation via UDP at `addr`.
    ///
    /// `addr` is resolved once, here; the first address it resolves to is the one we'll use for
    /// the lifetime of this transport.
    pub fn new<A: ToSocketAddrs>(addr: A) -> Result<UdpTransport> {
        let peer = addr
            .to_socket_addrs()
            .map_err(Error::connection)?
            .next()
            .ok_or_else(|| Error::connection("address resolved to nothing"))?;
        // Bind to any available port on an address of the same family as the collector...
        let local = match peer {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let socket = UdpSocket::bind(local).map_err(Error::connection)?;
        // and connect to it.
        socket.connect(peer).map_err(Error::connection)?;
        Ok(UdpTransport { socket })
    }
    /// Construct a [`Transport`] implementation via UDP to [`LOGENTRIES_ENDPOINT`]
    pub fn logentries() -> Result<UdpTransport> {
        UdpTransport::new(LOGENTRIES_ENDPOINT)
    }
    /// The address of the collector to which we're sending
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.socket.peer_addr().map_err(Error::connection)
    }
}

impl Transport for UdpTransport {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        self.socket.send(buf).map_err(|err| Error::Transmit {
            written: 0,
            expected: buf.len(),
            source: Some(Box::new(err)),
            back: Backtrace::new(),
        })
    }
}
