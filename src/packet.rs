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

//! The framed wire unit: a 16-byte header plus an opaque, length-bounded payload.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::op::Op;

/// Header size in bytes: op(4) + rid(4) + tid(4) + len(4).
pub const HEADER_SIZE: usize = 16;

/// Maximum payload size in bytes.
pub const XENSTORE_PAYLOAD_MAX: usize = 4096;

pub type ReqId = u32;
pub type TxId = u32;

/// A single framed XenStore message: a typed op, request/transaction ids,
/// and an opaque payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Packet {
    ty: Op,
    rid: ReqId,
    tid: TxId,
    data: Vec<u8>,
}

impl Packet {
    /// Construct a packet from its fields. `len` is derived from `data`.
    pub fn create(tid: TxId, rid: ReqId, ty: Op, data: Vec<u8>) -> Packet {
        Packet { ty, rid, tid, data }
    }

    pub fn ty(&self) -> Op {
        self.ty
    }

    pub fn rid(&self) -> ReqId {
        self.rid
    }

    pub fn tid(&self) -> TxId {
        self.tid
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The payload verbatim, without stripping any trailing NUL.
    pub fn get_data_raw(&self) -> &[u8] {
        &self.data
    }

    /// The payload with a single trailing NUL byte stripped, if present.
    ///
    /// Many payloads are C-string-terminated on the wire, but higher layers
    /// want the logical string without its terminator.
    pub fn get_data(&self) -> &[u8] {
        match self.data.last() {
            Some(0) => &self.data[..self.data.len() - 1],
            _ => &self.data,
        }
    }

    /// Serialize to the 16-byte header followed by the payload.
    pub fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.data.len());
        out.write_u32::<LittleEndian>(self.ty.to_int()).unwrap();
        out.write_u32::<LittleEndian>(self.rid).unwrap();
        out.write_u32::<LittleEndian>(self.tid).unwrap();
        out.write_u32::<LittleEndian>(self.data.len() as u32)
            .unwrap();
        out.extend_from_slice(&self.data);
        out
    }
}

/// The decoded, not-yet-validated contents of a 16-byte header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RawHeader {
    pub msg_type: u32,
    pub req_id: ReqId,
    pub tx_id: TxId,
    pub len: u32,
}

impl RawHeader {
    pub(crate) fn parse(bytes: &[u8; HEADER_SIZE]) -> RawHeader {
        let mut cursor = Cursor::new(&bytes[..]);
        RawHeader {
            msg_type: cursor.read_u32::<LittleEndian>().unwrap(),
            req_id: cursor.read_u32::<LittleEndian>().unwrap(),
            tx_id: cursor.read_u32::<LittleEndian>().unwrap(),
            len: cursor.read_u32::<LittleEndian>().unwrap(),
        }
    }

    /// The payload length, clamped to `[0, XENSTORE_PAYLOAD_MAX]`.
    pub(crate) fn clamped_len(&self) -> usize {
        (self.len as usize).min(XENSTORE_PAYLOAD_MAX)
    }
}
