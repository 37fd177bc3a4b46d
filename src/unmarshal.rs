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

//! Untyped accessors for pulling primitive values out of a reply packet's
//! payload, for callers that want to decode without going through the full
//! [`crate::response::Payload`] algebra.

use crate::acl::Acl;
use crate::packet::Packet;
use crate::response::OK;

/// The payload with a single trailing NUL trimmed, decoded as UTF-8.
pub fn string(packet: &Packet) -> Option<String> {
    std::str::from_utf8(packet.get_data()).ok().map(str::to_string)
}

/// The payload split on NUL into non-empty entries.
pub fn list(packet: &Packet) -> Option<Vec<String>> {
    packet
        .get_data_raw()
        .split(|&b| b == 0)
        .filter(|s| !s.is_empty())
        .map(|s| std::str::from_utf8(s).ok().map(str::to_string))
        .collect()
}

/// The payload decoded as an access-control list.
pub fn acl(packet: &Packet) -> Option<Acl> {
    Acl::unmarshal(&string(packet)?)
}

/// The payload decoded as a non-negative decimal integer.
pub fn int(packet: &Packet) -> Option<u64> {
    string(packet)?.parse().ok()
}

/// The payload decoded as a signed decimal integer.
pub fn int32(packet: &Packet) -> Option<i32> {
    string(packet)?.parse().ok()
}

/// Accept only an empty payload.
pub fn unit(packet: &Packet) -> Option<()> {
    packet.is_empty().then_some(())
}

/// Accept only the literal `"OK\0"` acknowledgement payload.
pub fn ok(packet: &Packet) -> Option<()> {
    (packet.get_data_raw() == OK).then_some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Op;

    #[test]
    fn string_trims_trailing_nul() {
        let pkt = Packet::create(0, 0, Op::Read, b"hello\0".to_vec());
        assert_eq!(string(&pkt).unwrap(), "hello");
    }

    #[test]
    fn list_splits_on_nul_and_drops_empties() {
        let pkt = Packet::create(0, 0, Op::Directory, b"a\0b\0c\0".to_vec());
        assert_eq!(list(&pkt).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn acl_decodes_owner_entry() {
        let pkt = Packet::create(0, 0, Op::Getperms, b"r7\0".to_vec());
        let acl = acl(&pkt).unwrap();
        assert_eq!(acl.owner, 7);
    }

    #[test]
    fn int_parses_decimal() {
        let pkt = Packet::create(0, 0, Op::TransactionStart, b"42\0".to_vec());
        assert_eq!(int(&pkt).unwrap(), 42);
    }

    #[test]
    fn int32_parses_negative() {
        let pkt = Packet::create(0, 0, Op::Error, b"-3\0".to_vec());
        assert_eq!(int32(&pkt).unwrap(), -3);
    }

    #[test]
    fn unit_requires_empty_payload() {
        let pkt = Packet::create(0, 0, Op::TransactionStart, Vec::new());
        assert!(unit(&pkt).is_some());
        let pkt = Packet::create(0, 0, Op::TransactionStart, b"x".to_vec());
        assert!(unit(&pkt).is_none());
    }

    #[test]
    fn ok_requires_the_literal() {
        let pkt = Packet::create(0, 0, Op::Write, b"OK\0".to_vec());
        assert!(ok(&pkt).is_some());
        let pkt = Packet::create(0, 0, Op::Write, b"nope".to_vec());
        assert!(ok(&pkt).is_none());
    }
}
