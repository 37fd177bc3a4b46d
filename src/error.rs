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

//! The error taxonomy shared by every layer of the wire protocol core.

use std::io;
use thiserror::Error;

/// XenStore error tokens as they appear on the wire, inside `Op::Error` payloads.
pub const XSE_ENOENT: &str = "ENOENT";
pub const XSE_EAGAIN: &str = "EAGAIN";
pub const XSE_EINVAL: &str = "EINVAL";

/// All ways the protocol core can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// An incoming packet's op code is not one of the 21 registered tags.
    #[error("unknown xenstore operation id: {0}")]
    UnknownOp(u32),

    /// A payload could not be split into the fields its op requires.
    #[error("failed to parse {0} payload: {1}")]
    ParseFailure(&'static str, String),

    /// A path violates length, emptiness, or character-class rules.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A path element contains a byte outside `[A-Za-z0-9_\-@]`.
    #[error("invalid character {byte:?} in path element")]
    InvalidChar { byte: u8 },

    /// The server reported that a key does not exist.
    #[error("ENOENT: {0}")]
    Enoent(String),

    /// The server reported that a transaction must be retried.
    #[error("EAGAIN: transaction must be retried")]
    Eagain,

    /// The server reported a malformed request.
    #[error("EINVAL: {0}")]
    Invalid(String),

    /// Any other server-reported error.
    #[error("xenstore error: {0}")]
    GenericError(String),

    /// The reply's op differs from the request's op (and is not `Error`).
    #[error("packet mismatch: sent {sent:?}, received {received:?}")]
    PacketMismatch { sent: crate::op::Op, received: crate::op::Op },

    /// The underlying channel returned zero bytes: the peer has closed the connection.
    #[error("the xenstore connection has closed")]
    EndOfStream,

    /// The underlying channel failed.
    #[error("xenstore channel I/O error")]
    Io(#[source] io::Error),
}

impl Error {
    /// Classify a server-reported error string (the payload of an `Op::Error`
    /// packet) into one of the canonical kinds, falling back to a generic
    /// error carrying the raw string.
    ///
    /// `hint` is the caller-supplied description of the request that failed
    /// (e.g. `"read"`); it is threaded through the `Enoent`/`Invalid` variants
    /// so the error names the operation that was rejected, not just the wire
    /// token. Any other payload is surfaced as `GenericError` carrying the
    /// raw wire string verbatim.
    pub fn from_wire(hint: &str, msg: &str) -> Error {
        match msg {
            XSE_ENOENT => Error::Enoent(hint.to_string()),
            XSE_EAGAIN => Error::Eagain,
            XSE_EINVAL => Error::Invalid(hint.to_string()),
            other => Error::GenericError(other.to_string()),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
