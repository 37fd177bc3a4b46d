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

//! Access-control lists: owner, default, and per-domain permission overrides.

pub type DomainId = u32;

/// A single permission level.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Perm {
    None,
    Read,
    Write,
    Rdwr,
}

impl Perm {
    fn code(self) -> char {
        match self {
            Perm::None => 'n',
            Perm::Read => 'r',
            Perm::Write => 'w',
            Perm::Rdwr => 'b',
        }
    }

    fn of_code(c: char) -> Option<Perm> {
        match c {
            'n' => Some(Perm::None),
            'r' => Some(Perm::Read),
            'w' => Some(Perm::Write),
            'b' => Some(Perm::Rdwr),
            _ => None,
        }
    }
}

/// An access-control list: an owning domain, the default permission granted
/// to every other domain, and per-domain overrides.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Acl {
    pub owner: DomainId,
    pub other: Perm,
    pub acl: Vec<(DomainId, Perm)>,
}

impl Acl {
    /// Serialize to the NUL-separated `<char><domid>` wire form. The owner
    /// entry (permission = `other`, domain = `owner`) is always first.
    pub fn marshal(&self) -> String {
        let mut entries = Vec::with_capacity(1 + self.acl.len());
        entries.push(format!("{}{}", self.other.code(), self.owner));
        for (id, perm) in &self.acl {
            entries.push(format!("{}{}", perm.code(), id));
        }
        entries.join("\0")
    }

    /// Parse the wire form produced by `marshal`. Returns `None` on any
    /// malformed entry: too short, or an unrecognized permission character.
    /// An empty string yields the all-default ACL `{owner: 0, other: None, acl: []}`.
    pub fn unmarshal(s: &str) -> Option<Acl> {
        if s.is_empty() {
            return Some(Acl {
                owner: 0,
                other: Perm::None,
                acl: Vec::new(),
            });
        }

        let mut entries = s.split('\0');
        let owner_entry = entries.next()?;
        let (other, owner) = parse_entry(owner_entry)?;

        let mut acl = Vec::new();
        for entry in entries {
            if entry.is_empty() {
                continue;
            }
            let (perm, id) = parse_entry(entry)?;
            acl.push((id, perm));
        }

        Some(Acl { owner, other, acl })
    }
}

fn parse_entry(entry: &str) -> Option<(Perm, DomainId)> {
    if entry.len() < 2 {
        return None;
    }
    let mut chars = entry.chars();
    let perm = Perm::of_code(chars.next()?)?;
    let id: DomainId = chars.as_str().parse().ok()?;
    Some((perm, id))
}
