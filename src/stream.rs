/**
    xenstore-rs provides a Rust based xenstore implementation.
    Copyright (C) 2016 Star Lab Corp.

    This program is free software; you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation; either version 2 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License along
    with this program; if not, see <http://www.gnu.org/licenses/>.
**/

//! Transport-agnostic packet framing over a byte channel.
//!
//! [`StdPacketStream`] works over any blocking `Read + Write` channel with no
//! async runtime at all. With the `tokio` feature enabled, [`TokioPacketStream`]
//! does the same over any `AsyncRead + AsyncWrite` channel.

use std::io::{Read, Write};

use crate::error::Error;
use crate::packet::Packet;
use crate::parser::{Parser, State};

/// The read/write framing loop shared by every concrete binding: drive a
/// fresh read through the parser until it reports `Done`, then hand back the
/// result and reset for the next frame.
struct Framer {
    parser: Parser,
}

impl Framer {
    fn new() -> Framer {
        Framer { parser: Parser::create() }
    }

    fn take_result(&mut self) -> Option<Result<Packet, Error>> {
        self.parser.take_finished()
    }

    fn wanted(&self) -> usize {
        match self.parser.state() {
            State::Continue(n) => n,
            State::Done(_) => 0,
        }
    }
}

/// A `PacketStream` bound to a blocking `std::io::Read + std::io::Write` channel.
pub struct StdPacketStream<T> {
    channel: T,
    framer: Framer,
}

impl<T: Read + Write> StdPacketStream<T> {
    pub fn new(channel: T) -> StdPacketStream<T> {
        StdPacketStream { channel, framer: Framer::new() }
    }

    pub fn into_inner(self) -> T {
        self.channel
    }

    /// Receive one complete packet, blocking until it arrives.
    pub fn recv(&mut self) -> Result<Packet, Error> {
        loop {
            if let Some(result) = self.framer.take_result() {
                if let Ok(pkt) = &result {
                    log::trace!("recv: {:?}, {} payload bytes", pkt.ty(), pkt.len());
                }
                return result;
            }
            let mut buf = vec![0u8; self.framer.wanted()];
            let n = self.channel.read(&mut buf)?;
            if n == 0 {
                return Err(Error::EndOfStream);
            }
            self.framer.parser.input(&buf[..n]);
        }
    }

    /// Send one packet in full.
    pub fn send(&mut self, pkt: &Packet) -> Result<(), Error> {
        log::trace!("send: {:?}, {} payload bytes", pkt.ty(), pkt.len());
        self.channel.write_all(&pkt.marshal())?;
        Ok(())
    }
}

#[cfg(feature = "tokio")]
pub use self::tokio_stream::TokioPacketStream;

#[cfg(feature = "tokio")]
mod tokio_stream {
    use super::*;
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

    /// A `PacketStream` bound to a Tokio `AsyncRead + AsyncWrite` channel.
    pub struct TokioPacketStream<T> {
        channel: T,
        framer: Framer,
    }

    impl<T: AsyncRead + AsyncWrite + Unpin> TokioPacketStream<T> {
        pub fn new(channel: T) -> TokioPacketStream<T> {
            TokioPacketStream { channel, framer: Framer::new() }
        }

        pub fn into_inner(self) -> T {
            self.channel
        }

        /// Receive one complete packet, awaiting until it arrives.
        pub async fn recv(&mut self) -> Result<Packet, Error> {
            loop {
                if let Some(result) = self.framer.take_result() {
                    if let Ok(pkt) = &result {
                        log::trace!("recv: {:?}, {} payload bytes", pkt.ty(), pkt.len());
                    }
                    return result;
                }
                let mut buf = vec![0u8; self.framer.wanted()];
                let n = self.channel.read(&mut buf).await?;
                if n == 0 {
                    return Err(Error::EndOfStream);
                }
                self.framer.parser.input(&buf[..n]);
            }
        }

        /// Send one packet in full.
        pub async fn send(&mut self, pkt: &Packet) -> Result<(), Error> {
            log::trace!("send: {:?}, {} payload bytes", pkt.ty(), pkt.len());
            self.channel.write_all(&pkt.marshal()).await?;
            Ok(())
        }
    }
}
