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

//! The typed response payload algebra: marshal to a `Packet`, parse back from one.

use crate::acl::Acl;
use crate::name::Name;
use crate::op::Op;
use crate::packet::{Packet, ReqId, TxId};
use crate::path::Path;
use crate::token::Token;

/// The literal acknowledgement payload shared by every bare "it worked" reply.
pub const OK: &[u8] = b"OK\0";

/// A typed XenStore response payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Read(Vec<u8>),
    Directory(Vec<String>),
    Getperms(Acl),
    Getdomainpath(Path),
    TransactionStart(TxId),
    Isintroduced(bool),
    Watchevent(Name, Token),
    Error(String),
    Debug(Vec<String>),
    Write,
    Mkdir,
    Rm,
    Setperms,
    Watch,
    Unwatch,
    TransactionEnd,
    Introduce,
    Resume,
    Release,
    SetTarget,
    Restrict,
}

impl Payload {
    /// The `Op` this payload is carried by.
    pub fn ty_of_payload(&self) -> Op {
        match self {
            Payload::Read(_) => Op::Read,
            Payload::Directory(_) => Op::Directory,
            Payload::Getperms(_) => Op::Getperms,
            Payload::Getdomainpath(_) => Op::Getdomainpath,
            Payload::TransactionStart(_) => Op::TransactionStart,
            Payload::Isintroduced(_) => Op::Isintroduced,
            Payload::Watchevent(_, _) => Op::Watchevent,
            Payload::Error(_) => Op::Error,
            Payload::Debug(_) => Op::Debug,
            Payload::Write => Op::Write,
            Payload::Mkdir => Op::Mkdir,
            Payload::Rm => Op::Rm,
            Payload::Setperms => Op::Setperms,
            Payload::Watch => Op::Watch,
            Payload::Unwatch => Op::Unwatch,
            Payload::TransactionEnd => Op::TransactionEnd,
            Payload::Introduce => Op::Introduce,
            Payload::Resume => Op::Resume,
            Payload::Release => Op::Release,
            Payload::SetTarget => Op::SetTarget,
            Payload::Restrict => Op::Restrict,
        }
    }

    fn body(&self) -> Vec<u8> {
        match self {
            Payload::Read(data) => data.clone(),
            Payload::Directory(entries) => join_nul_terminated(entries),
            Payload::Getperms(acl) => {
                let mut out = acl.marshal().into_bytes();
                out.push(0);
                out
            }
            Payload::Getdomainpath(p) => nul_terminated(&p.to_string()),
            Payload::TransactionStart(tid) => nul_terminated(&tid.to_string()),
            Payload::Isintroduced(b) => nul_terminated(if *b { "T" } else { "F" }),
            Payload::Watchevent(node, token) => {
                let mut out = nul_terminated(&node.to_string());
                out.extend_from_slice(token.as_str().as_bytes());
                out.push(0);
                out
            }
            Payload::Error(msg) => nul_terminated(msg),
            Payload::Debug(items) => join_nul_terminated(items),
            Payload::Write
            | Payload::Mkdir
            | Payload::Rm
            | Payload::Setperms
            | Payload::Watch
            | Payload::Unwatch
            | Payload::TransactionEnd
            | Payload::Introduce
            | Payload::Resume
            | Payload::Release
            | Payload::SetTarget
            | Payload::Restrict => OK.to_vec(),
        }
    }

    /// Render this response payload as a `Packet`.
    pub fn marshal(&self, tid: TxId, rid: ReqId) -> Packet {
        Packet::create(tid, rid, self.ty_of_payload(), self.body())
    }

    /// Recover a typed payload from a packet previously produced by `marshal`.
    pub fn parse(packet: &Packet) -> Option<Payload> {
        let data = packet.get_data_raw();
        match packet.ty() {
            Op::Read => Some(Payload::Read(data.to_vec())),
            Op::Directory => Some(Payload::Directory(split_nul(data))),
            Op::Getperms => {
                let s = trim_trailing_nul(data);
                Acl::unmarshal(std::str::from_utf8(s).ok()?).map(Payload::Getperms)
            }
            Op::Getdomainpath => Path::of_string(one_string(data)?).ok().map(Payload::Getdomainpath),
            Op::TransactionStart => one_string(data)?.parse().ok().map(Payload::TransactionStart),
            Op::Isintroduced => parse_bool(one_string(data)?).map(Payload::Isintroduced),
            Op::Watchevent => {
                let (node, token) = two_strings(data)?;
                let node = Name::of_string(node).ok()?;
                Some(Payload::Watchevent(node, Token::from_wire(trim_trailing_nul_str(token))))
            }
            Op::Error => Some(Payload::Error(one_string(data)?.to_string())),
            Op::Debug => Some(Payload::Debug(split_nul(data))),
            Op::Write => is_ok(data).then_some(Payload::Write),
            Op::Mkdir => is_ok(data).then_some(Payload::Mkdir),
            Op::Rm => is_ok(data).then_some(Payload::Rm),
            Op::Setperms => is_ok(data).then_some(Payload::Setperms),
            Op::Watch => is_ok(data).then_some(Payload::Watch),
            Op::Unwatch => is_ok(data).then_some(Payload::Unwatch),
            Op::TransactionEnd => is_ok(data).then_some(Payload::TransactionEnd),
            Op::Introduce => is_ok(data).then_some(Payload::Introduce),
            Op::Resume => is_ok(data).then_some(Payload::Resume),
            Op::Release => is_ok(data).then_some(Payload::Release),
            Op::SetTarget => is_ok(data).then_some(Payload::SetTarget),
            Op::Restrict => is_ok(data).then_some(Payload::Restrict),
        }
    }
}

fn is_ok(data: &[u8]) -> bool {
    data == OK
}

fn nul_terminated(s: &str) -> Vec<u8> {
    let mut out = s.as_bytes().to_vec();
    out.push(0);
    out
}

fn join_nul_terminated(items: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    for item in items {
        out.extend_from_slice(item.as_bytes());
        out.push(0);
    }
    out
}

fn trim_trailing_nul(data: &[u8]) -> &[u8] {
    match data.last() {
        Some(0) => &data[..data.len() - 1],
        _ => data,
    }
}

fn trim_trailing_nul_str(s: &str) -> &str {
    s.strip_suffix('\0').unwrap_or(s)
}

fn one_string(data: &[u8]) -> Option<&str> {
    let idx = data.iter().position(|&b| b == 0)?;
    if idx != data.len() - 1 {
        return None;
    }
    std::str::from_utf8(&data[..idx]).ok()
}

fn two_strings(data: &[u8]) -> Option<(&str, &str)> {
    let idx = data.iter().position(|&b| b == 0)?;
    let a = std::str::from_utf8(&data[..idx]).ok()?;
    let b = std::str::from_utf8(&data[idx + 1..]).ok()?;
    Some((a, b))
}

fn split_nul(data: &[u8]) -> Vec<String> {
    let mut parts: Vec<&[u8]> = data.split(|&b| b == 0).collect();
    if parts.last().is_some_and(|s| s.is_empty()) {
        parts.pop();
    }
    parts
        .into_iter()
        .filter_map(|s| std::str::from_utf8(s).ok())
        .map(|s| s.to_string())
        .collect()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "T" => Some(true),
        "F" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::Perm;

    #[test]
    fn directory_empty_has_empty_body() {
        let payload = Payload::Directory(Vec::new());
        let pkt = payload.marshal(0, 0);
        assert!(pkt.is_empty());
    }

    #[test]
    fn ack_variants_share_the_ok_literal() {
        for payload in [Payload::Write, Payload::Mkdir, Payload::TransactionEnd] {
            let pkt = payload.marshal(0, 0);
            assert_eq!(pkt.get_data_raw(), OK);
        }
    }

    #[test]
    fn round_trip_every_variant() {
        let cases = vec![
            Payload::Read(b"hello".to_vec()),
            Payload::Directory(vec!["a".into(), "b".into()]),
            Payload::Directory(Vec::new()),
            Payload::Getperms(Acl {
                owner: 0,
                other: Perm::None,
                acl: vec![(1, Perm::Read)],
            }),
            Payload::Getdomainpath(Path::of_string("/local/domain/3").unwrap()),
            Payload::TransactionStart(42),
            Payload::Isintroduced(true),
            Payload::Isintroduced(false),
            Payload::Watchevent(Name::of_string("/a/b").unwrap(), Token::new("1", "tag")),
            Payload::Error("ENOENT".into()),
            Payload::Debug(vec!["x".into()]),
            Payload::Write,
            Payload::Mkdir,
            Payload::Rm,
            Payload::Setperms,
            Payload::Watch,
            Payload::Unwatch,
            Payload::TransactionEnd,
            Payload::Introduce,
            Payload::Resume,
            Payload::Release,
            Payload::SetTarget,
            Payload::Restrict,
        ];

        for payload in cases {
            let pkt = payload.marshal(0, 0);
            assert_eq!(pkt.ty(), payload.ty_of_payload());
            let parsed = Payload::parse(&pkt).unwrap_or_else(|| panic!("failed to parse back {:?}", payload));
            assert_eq!(parsed, payload);
        }
    }

    #[test]
    fn malformed_ack_body_is_rejected() {
        let pkt = Packet::create(0, 0, Op::Write, b"not-ok".to_vec());
        assert!(Payload::parse(&pkt).is_none());
    }

    #[test]
    fn debug_round_trips_an_empty_string_item() {
        let payload = Payload::Debug(vec!["".into(), "b".into()]);
        let pkt = payload.marshal(0, 0);
        assert_eq!(pkt.get_data_raw(), b"\0b\0");
        assert_eq!(Payload::parse(&pkt), Some(payload));
    }
}
