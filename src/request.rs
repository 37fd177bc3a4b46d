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

//! The typed request payload algebra: marshal to a `Packet`, parse back from one.

use crate::acl::{Acl, DomainId};
use crate::name::Name;
use crate::op::Op;
use crate::packet::{Packet, ReqId, TxId};
use crate::path::Path;
use crate::token::Token;

/// The verb carried by a `PathOp` request: every path-addressed operation
/// except `Write`/`Setperms` just names the path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathVerb {
    Read,
    Directory,
    Getperms,
    Mkdir,
    Rm,
    Write(Vec<u8>),
    Setperms(Acl),
}

/// A typed XenStore request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    PathOp(Path, PathVerb),
    Getdomainpath(DomainId),
    TransactionStart,
    TransactionEnd(bool),
    Watch(Name, Token),
    Unwatch(Name, Token),
    Debug(Vec<String>),
    Introduce(DomainId, u64, u16),
    Resume(DomainId),
    Release(DomainId),
    Restrict(DomainId),
    Isintroduced(DomainId),
    SetTarget(DomainId, DomainId),
}

impl Payload {
    fn op(&self) -> Op {
        match self {
            Payload::PathOp(_, PathVerb::Read) => Op::Read,
            Payload::PathOp(_, PathVerb::Directory) => Op::Directory,
            Payload::PathOp(_, PathVerb::Getperms) => Op::Getperms,
            Payload::PathOp(_, PathVerb::Mkdir) => Op::Mkdir,
            Payload::PathOp(_, PathVerb::Rm) => Op::Rm,
            Payload::PathOp(_, PathVerb::Write(_)) => Op::Write,
            Payload::PathOp(_, PathVerb::Setperms(_)) => Op::Setperms,
            Payload::Getdomainpath(_) => Op::Getdomainpath,
            Payload::TransactionStart => Op::TransactionStart,
            Payload::TransactionEnd(_) => Op::TransactionEnd,
            Payload::Watch(_, _) => Op::Watch,
            Payload::Unwatch(_, _) => Op::Unwatch,
            Payload::Debug(_) => Op::Debug,
            Payload::Introduce(_, _, _) => Op::Introduce,
            Payload::Resume(_) => Op::Resume,
            Payload::Release(_) => Op::Release,
            Payload::Restrict(_) => Op::Restrict,
            Payload::Isintroduced(_) => Op::Isintroduced,
            Payload::SetTarget(_, _) => Op::SetTarget,
        }
    }

    /// True when `tid` is meaningful for this payload; everything else is
    /// forced to `0` on the wire regardless of what the caller passed in.
    fn is_transactional(&self) -> bool {
        matches!(self, Payload::PathOp(_, _) | Payload::TransactionEnd(_))
    }

    fn body(&self) -> Vec<u8> {
        match self {
            Payload::PathOp(p, PathVerb::Write(v)) => {
                let mut out = p.to_string().into_bytes();
                out.push(0);
                out.extend_from_slice(v);
                out
            }
            Payload::PathOp(p, PathVerb::Setperms(acl)) => {
                let mut out = p.to_string().into_bytes();
                out.push(0);
                out.extend_from_slice(acl.marshal().as_bytes());
                out.push(0);
                out
            }
            Payload::PathOp(p, _) => nul_terminated(&p.to_string()),
            Payload::Getdomainpath(d) => nul_terminated(&d.to_string()),
            Payload::TransactionStart => Vec::new(),
            Payload::TransactionEnd(commit) => {
                nul_terminated(if *commit { "T" } else { "F" })
            }
            Payload::Watch(node, token) | Payload::Unwatch(node, token) => {
                let mut out = nul_terminated(&node.to_string());
                out.extend_from_slice(token.as_str().as_bytes());
                out.push(0);
                out
            }
            Payload::Debug(items) => join_nul_terminated(items),
            Payload::Introduce(d, mfn, port) => {
                let mut out = nul_terminated(&d.to_string());
                out.extend_from_slice(nul_terminated(&mfn.to_string()).as_slice());
                out.extend_from_slice(nul_terminated(&port.to_string()).as_slice());
                out
            }
            Payload::Resume(d)
            | Payload::Release(d)
            | Payload::Restrict(d)
            | Payload::Isintroduced(d) => nul_terminated(&d.to_string()),
            Payload::SetTarget(mine, yours) => {
                let mut out = nul_terminated(&mine.to_string());
                out.extend_from_slice(nul_terminated(&yours.to_string()).as_slice());
                out
            }
        }
    }

    /// Render this request payload as a `Packet`.
    pub fn marshal(&self, tid: TxId, rid: ReqId) -> Packet {
        let tid = if self.is_transactional() { tid } else { 0 };
        Packet::create(tid, rid, self.op(), self.body())
    }

    /// Recover a typed payload from a packet previously produced by `marshal`.
    ///
    /// Returns `None` if the payload does not match the shape its op requires.
    pub fn parse(packet: &Packet) -> Option<Payload> {
        let data = packet.get_data_raw();
        match packet.ty() {
            Op::Read => Some(Payload::PathOp(one_path(data)?, PathVerb::Read)),
            Op::Directory => Some(Payload::PathOp(one_path(data)?, PathVerb::Directory)),
            Op::Getperms => Some(Payload::PathOp(one_path(data)?, PathVerb::Getperms)),
            Op::Mkdir => Some(Payload::PathOp(one_path(data)?, PathVerb::Mkdir)),
            Op::Rm => Some(Payload::PathOp(one_path(data)?, PathVerb::Rm)),
            Op::Write => {
                let idx = memchr(data, 0)?;
                let path = Path::of_string(std::str::from_utf8(&data[..idx]).ok()?).ok()?;
                Some(Payload::PathOp(path, PathVerb::Write(data[idx + 1..].to_vec())))
            }
            Op::Setperms => {
                let idx = memchr(data, 0)?;
                let path = Path::of_string(std::str::from_utf8(&data[..idx]).ok()?).ok()?;
                let rest = trim_trailing_nul(&data[idx + 1..]);
                let acl = Acl::unmarshal(std::str::from_utf8(rest).ok()?)?;
                Some(Payload::PathOp(path, PathVerb::Setperms(acl)))
            }
            Op::Getdomainpath => Some(Payload::Getdomainpath(domid(one_string(data)?))),
            Op::TransactionStart => {
                if data.is_empty() {
                    Some(Payload::TransactionStart)
                } else {
                    None
                }
            }
            Op::TransactionEnd => Some(Payload::TransactionEnd(parse_bool(one_string(data)?)?)),
            Op::Watch | Op::Unwatch => {
                let (node, token) = two_strings(data)?;
                let node = Name::of_string(node).ok()?;
                let token = Token::from_wire(trim_trailing_nul_str(token));
                if packet.ty() == Op::Watch {
                    Some(Payload::Watch(node, token))
                } else {
                    Some(Payload::Unwatch(node, token))
                }
            }
            Op::Debug => Some(Payload::Debug(split_nul(data))),
            Op::Introduce => {
                let parts = split_nul(data);
                if parts.len() != 3 {
                    return None;
                }
                Some(Payload::Introduce(
                    domid(&parts[0]),
                    parts[1].parse().ok()?,
                    parts[2].parse().ok()?,
                ))
            }
            Op::Resume => Some(Payload::Resume(domid(one_string(data)?))),
            Op::Release => Some(Payload::Release(domid(one_string(data)?))),
            Op::Restrict => Some(Payload::Restrict(domid(one_string(data)?))),
            Op::Isintroduced => Some(Payload::Isintroduced(domid(one_string(data)?))),
            Op::SetTarget => {
                let (mine, yours) = two_strings(data)?;
                Some(Payload::SetTarget(domid(mine), domid(yours)))
            }
            Op::Watchevent | Op::Error => None,
        }
    }
}

fn one_path(data: &[u8]) -> Option<Path> {
    Path::of_string(one_string(data)?).ok()
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

fn memchr(data: &[u8], byte: u8) -> Option<usize> {
    data.iter().position(|&b| b == byte)
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

/// `"x\0"` exactly: one NUL-terminated string, nothing more.
fn one_string(data: &[u8]) -> Option<&str> {
    let idx = memchr(data, 0)?;
    if idx != data.len() - 1 {
        return None;
    }
    std::str::from_utf8(&data[..idx]).ok()
}

/// Split once on the first NUL, yielding the text before and the remainder
/// after it (which may itself still carry a trailing NUL).
fn two_strings(data: &[u8]) -> Option<(&str, &str)> {
    let idx = memchr(data, 0)?;
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

/// A permissive decimal parser: skip leading non-digits, then read digits.
fn domid(s: &str) -> DomainId {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "T" => Some(true),
        "F" => Some(false),
        _ => None,
    }
}
