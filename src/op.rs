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

//! The closed enumeration of XenStore wire operations.
//!
//! The wire code for each tag is its zero-based index in the list below.
//! This order is part of the wire format and must never change.

use crate::error::Error;

/// A single XenStore operation tag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Op {
    Debug,
    Directory,
    Read,
    Getperms,
    Watch,
    Unwatch,
    TransactionStart,
    TransactionEnd,
    Introduce,
    Release,
    Getdomainpath,
    Write,
    Mkdir,
    Rm,
    Setperms,
    Watchevent,
    Error,
    Isintroduced,
    Resume,
    SetTarget,
    Restrict,
}

/// All 21 tags, in wire order. Index into this array equals the wire code.
const ALL: [Op; 21] = [
    Op::Debug,
    Op::Directory,
    Op::Read,
    Op::Getperms,
    Op::Watch,
    Op::Unwatch,
    Op::TransactionStart,
    Op::TransactionEnd,
    Op::Introduce,
    Op::Release,
    Op::Getdomainpath,
    Op::Write,
    Op::Mkdir,
    Op::Rm,
    Op::Setperms,
    Op::Watchevent,
    Op::Error,
    Op::Isintroduced,
    Op::Resume,
    Op::SetTarget,
    Op::Restrict,
];

impl Op {
    /// Every tag, in wire order.
    pub fn all() -> &'static [Op] {
        &ALL
    }

    /// The wire code for this tag.
    pub fn to_int(self) -> u32 {
        match self {
            Op::Debug => 0,
            Op::Directory => 1,
            Op::Read => 2,
            Op::Getperms => 3,
            Op::Watch => 4,
            Op::Unwatch => 5,
            Op::TransactionStart => 6,
            Op::TransactionEnd => 7,
            Op::Introduce => 8,
            Op::Release => 9,
            Op::Getdomainpath => 10,
            Op::Write => 11,
            Op::Mkdir => 12,
            Op::Rm => 13,
            Op::Setperms => 14,
            Op::Watchevent => 15,
            Op::Error => 16,
            Op::Isintroduced => 17,
            Op::Resume => 18,
            Op::SetTarget => 19,
            Op::Restrict => 20,
        }
    }

    /// Decode a wire code into an `Op`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownOp` when `code` is not one of the 21 registered
    /// tags. This is the only signal available that a peer is speaking an
    /// unknown protocol version.
    pub fn of_int(code: u32) -> Result<Op, Error> {
        ALL.get(code as usize)
            .copied()
            .ok_or(Error::UnknownOp(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijection_round_trip() {
        for &op in Op::all() {
            assert_eq!(Op::of_int(op.to_int()).unwrap(), op);
        }
    }

    #[test]
    fn bijection_covers_zero_to_twenty() {
        for i in 0..21u32 {
            let op = Op::of_int(i).unwrap();
            assert_eq!(op.to_int(), i);
        }
    }

    #[test]
    fn out_of_range_is_error() {
        assert!(Op::of_int(21).is_err());
        assert!(Op::of_int(0xffff).is_err());
    }

    #[test]
    fn ordering_matches_wire_spec() {
        let codes: Vec<u32> = Op::all().iter().map(|op| op.to_int()).collect();
        assert_eq!(codes, (0..21).collect::<Vec<u32>>());
    }
}
