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

//! Matches a reply packet against the request that provoked it, classifying
//! server-reported errors and op mismatches along the way.

use crate::error::Error;
use crate::packet::Packet;
use crate::unmarshal;

/// Correlate `received` against `sent`, decoding it with `decode` on success.
///
/// - If `received` is an `Op::Error` packet, its payload is classified via
///   [`Error::from_wire`] using `debug_hint` to name the failed operation.
/// - Otherwise, if the ops match, `decode(received)` is invoked; `None`
///   becomes a [`Error::ParseFailure`] naming `debug_hint` and the raw payload.
/// - Otherwise the ops differ and neither is `Error`: [`Error::PacketMismatch`].
pub fn response<T>(
    debug_hint: &str,
    sent: &Packet,
    received: &Packet,
    decode: impl FnOnce(&Packet) -> Option<T>,
) -> Result<T, Error> {
    if received.ty() == crate::op::Op::Error {
        let msg = unmarshal::string(received).unwrap_or_default();
        return Err(Error::from_wire(debug_hint, &msg));
    }

    if sent.ty() == received.ty() {
        return decode(received).ok_or_else(|| {
            Error::ParseFailure(
                "response",
                format!("{}: {:?}", debug_hint, received.get_data_raw()),
            )
        });
    }

    Err(Error::PacketMismatch {
        sent: sent.ty(),
        received: received.ty(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Op;

    #[test]
    fn classifies_enoent() {
        let sent = Packet::create(0, 0, Op::Read, b"/a\0".to_vec());
        let received = Packet::create(0, 0, Op::Error, b"ENOENT\0".to_vec());
        let result: Result<Vec<u8>, Error> =
            response("read", &sent, &received, |p| Some(p.get_data().to_vec()));
        assert!(matches!(result, Err(Error::Enoent(hint)) if hint == "read"));
    }

    #[test]
    fn classifies_unknown_wire_error_as_generic() {
        let sent = Packet::create(0, 0, Op::Read, b"/a\0".to_vec());
        let received = Packet::create(0, 0, Op::Error, b"EPERM\0".to_vec());
        let result: Result<Vec<u8>, Error> =
            response("read", &sent, &received, |p| Some(p.get_data().to_vec()));
        assert!(matches!(result, Err(Error::GenericError(msg)) if msg == "EPERM"));
    }

    #[test]
    fn matching_op_decodes_successfully() {
        let sent = Packet::create(0, 0, Op::Read, b"/a\0".to_vec());
        let received = Packet::create(0, 0, Op::Read, b"value".to_vec());
        let result = response("read", &sent, &received, |p| Some(p.get_data().to_vec()));
        assert_eq!(result.unwrap(), b"value".to_vec());
    }

    #[test]
    fn decode_failure_is_a_parse_failure() {
        let sent = Packet::create(0, 0, Op::TransactionStart, Vec::new());
        let received = Packet::create(0, 0, Op::TransactionStart, b"not-a-number\0".to_vec());
        let result: Result<u64, Error> = response("transaction_start", &sent, &received, |p| {
            unmarshal::int(p)
        });
        assert!(matches!(result, Err(Error::ParseFailure(_, _))));
    }

    #[test]
    fn mismatched_op_is_a_packet_mismatch() {
        let sent = Packet::create(0, 0, Op::Read, b"/a\0".to_vec());
        let received = Packet::create(0, 0, Op::Directory, b"a\0b\0".to_vec());
        let result: Result<Vec<u8>, Error> =
            response("read", &sent, &received, |p| Some(p.get_data().to_vec()));
        assert!(matches!(
            result,
            Err(Error::PacketMismatch { sent: Op::Read, received: Op::Directory })
        ));
    }
}
