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

//! Watch tokens: an opaque cookie returned verbatim with matching watch events.

/// A watch registration token: `<prefix>:<user-supplied suffix>`.
///
/// The prefix is an opaque cookie chosen by whoever registers the watch
/// (commonly a monotonically increasing counter or an epoch); the core
/// never inspects it beyond splitting it off. The suffix is the caller's
/// own tag, handed back unmodified on every matching watch event.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Token(String);

impl Token {
    /// Build a token from an internal prefix and a user-supplied suffix.
    pub fn new(prefix: &str, suffix: &str) -> Token {
        Token(format!("{}:{}", prefix, suffix))
    }

    /// Wrap an already-encoded token string as-is (e.g. one received on the wire).
    pub fn from_wire(s: &str) -> Token {
        Token(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split off the user-supplied suffix, the part returned to callers when
    /// decoding a watch event. Tokens with no `:` separator have no prefix
    /// and the whole string is treated as the suffix.
    pub fn suffix(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, suffix)) => suffix,
            None => &self.0,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
