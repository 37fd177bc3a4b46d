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

//! The path grammar: a strict, slash-separated, character-restricted key path.

use crate::error::Error;

/// Maximum encoded length of a path, in bytes.
pub const MAX_PATH: usize = 1024;

fn is_element_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'@'
}

/// A single non-empty path component over `[A-Za-z0-9_\-@]`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Element(String);

impl Element {
    fn parse(s: &str) -> Result<Element, Error> {
        if s.is_empty() {
            return Err(Error::InvalidPath {
                path: s.to_string(),
                reason: "empty path element".into(),
            });
        }
        if let Some(&bad) = s.as_bytes().iter().find(|b| !is_element_byte(**b)) {
            return Err(Error::InvalidChar { byte: bad });
        }
        Ok(Element(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An ordered sequence of `Element`s. The empty path denotes the root.
///
/// A `Path` remembers whether it was parsed from an absolute (`/`-prefixed)
/// or relative string, so that `to_string` can reproduce the original form —
/// required for `PathOp`/`Getdomainpath` wire payloads, which carry the
/// leading `/` of an absolute store path verbatim.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Path {
    absolute: bool,
    elements: Vec<Element>,
}

impl Path {
    /// The empty (root) path.
    pub fn root() -> Path {
        Path { absolute: false, elements: Vec::new() }
    }

    /// Parse a path string.
    ///
    /// Rejects empty input, input longer than `MAX_PATH` bytes, and any
    /// segment outside the permitted alphabet. A leading `/` marks the path
    /// absolute and is stripped before splitting; `"/"` alone parses to the
    /// empty absolute path.
    pub fn of_string(s: &str) -> Result<Path, Error> {
        if s.is_empty() {
            return Err(Error::InvalidPath {
                path: s.to_string(),
                reason: "empty path is not allowed".into(),
            });
        }
        if s.len() > MAX_PATH {
            return Err(Error::InvalidPath {
                path: s.to_string(),
                reason: format!("path must be at most {} bytes", MAX_PATH),
            });
        }

        let absolute = s.starts_with('/');
        let body = s.strip_prefix('/').unwrap_or(s);
        if body.is_empty() {
            return Ok(Path { absolute, elements: Vec::new() });
        }

        let elements = body
            .split('/')
            .map(Element::parse)
            .collect::<Result<Vec<Element>, Error>>()?;
        Ok(Path { absolute, elements })
    }

    /// Render the path back to its original string form: `/`-prefixed if it
    /// was parsed absolute, bare otherwise. The empty path always renders as
    /// the empty string — the normalization `"/"` undergoes on parse.
    pub fn to_string(&self) -> String {
        if self.elements.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        if self.absolute {
            out.push('/');
        }
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            out.push_str(e.as_str());
        }
        out
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Drop the last element. The root path returns itself.
    pub fn dirname(&self) -> Path {
        if self.elements.is_empty() {
            return self.clone();
        }
        Path {
            absolute: self.absolute,
            elements: self.elements[..self.elements.len() - 1].to_vec(),
        }
    }

    /// The last element, if any.
    pub fn basename(&self) -> Option<&Element> {
        self.elements.last()
    }

    /// Append an element.
    pub fn push(&self, element: &str) -> Result<Path, Error> {
        let mut v = self.elements.clone();
        v.push(Element::parse(element)?);
        Ok(Path { absolute: self.absolute, elements: v })
    }

    /// Fold a function left-to-right over every element.
    pub fn walk<A, F: FnMut(A, &Element) -> A>(&self, init: A, mut f: F) -> A {
        self.elements.iter().fold(init, |acc, e| f(acc, e))
    }

    /// Fold over every non-empty prefix of the path, in increasing length.
    pub fn fold<A, F: FnMut(A, &Path) -> A>(&self, init: A, mut f: F) -> A {
        let mut acc = init;
        for len in 1..=self.elements.len() {
            let prefix = Path { absolute: self.absolute, elements: self.elements[..len].to_vec() };
            acc = f(acc, &prefix);
        }
        acc
    }

    /// Visit every non-empty prefix of the path, in increasing length.
    pub fn iter<F: FnMut(&Path)>(&self, mut f: F) {
        self.fold((), |(), p| f(p));
    }

    /// The longest shared prefix of `self` and `other`.
    pub fn common_prefix(&self, other: &Path) -> Path {
        let n = self
            .elements
            .iter()
            .zip(other.elements.iter())
            .take_while(|(a, b)| a == b)
            .count();
        Path { absolute: self.absolute, elements: self.elements[..n].to_vec() }
    }

    /// True if `self` starts with every element of `prefix`, in order.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        prefix.elements.len() <= self.elements.len()
            && self.elements[..prefix.elements.len()] == prefix.elements[..]
    }

    /// The elements of `self` that remain after stripping `prefix`, or
    /// `None` if `prefix` is not actually a prefix of `self`. The remainder
    /// is always relative: stripping an absolute prefix off an absolute path
    /// yields a path meant to be resolved relative to that prefix.
    pub fn strip_prefix(&self, prefix: &Path) -> Option<Path> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Path { absolute: false, elements: self.elements[prefix.elements.len()..].to_vec() })
    }

    /// Concatenate two paths. The result keeps `self`'s absoluteness.
    pub fn append(&self, other: &Path) -> Path {
        let mut v = self.elements.clone();
        v.extend(other.elements.iter().cloned());
        Path { absolute: self.absolute, elements: v }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, Arbitrary, Gen};

    #[test]
    fn empty_path_rejected() {
        assert!(Path::of_string("").is_err());
    }

    #[test]
    fn too_long_path_rejected() {
        let s = format!("/{}", "a".repeat(MAX_PATH));
        assert!(Path::of_string(&s).is_err());
    }

    #[test]
    fn root_normalizes_to_empty_string() {
        let p = Path::of_string("/").unwrap();
        assert!(p.is_root());
        assert_eq!(p.to_string(), "");
    }

    #[test]
    fn invalid_char_is_rejected() {
        assert!(Path::of_string("/foo bar").is_err());
        assert!(Path::of_string("/foo!bar").is_err());
    }

    #[test]
    fn round_trip_simple() {
        let s = "/local/domain/1/name";
        let p = Path::of_string(s).unwrap();
        assert_eq!(p.to_string(), s);
    }

    #[test]
    fn round_trip_relative() {
        let s = "local/domain/1";
        let p = Path::of_string(s).unwrap();
        assert_eq!(p.to_string(), s);
    }

    #[test]
    fn dirname_and_basename() {
        let p = Path::of_string("/a/b/c").unwrap();
        assert_eq!(p.dirname().to_string(), "/a/b");
        assert_eq!(p.basename().unwrap().as_str(), "c");
        assert_eq!(Path::root().dirname(), Path::root());
        assert_eq!(Path::root().basename(), None);
    }

    #[test]
    fn absolute_path_round_trips_with_leading_slash() {
        let s = "/foo/bar";
        let p = Path::of_string(s).unwrap();
        assert!(p.is_absolute());
        assert_eq!(p.to_string(), s);
    }

    #[test]
    fn fold_visits_every_prefix() {
        let p = Path::of_string("/a/b/c").unwrap();
        let prefixes: Vec<String> = p.fold(Vec::new(), |mut acc, prefix| {
            acc.push(prefix.to_string());
            acc
        });
        assert_eq!(prefixes, vec!["/a", "/a/b", "/a/b/c"]);
    }

    #[test]
    fn common_prefix_basic() {
        let a = Path::of_string("/a/b/c").unwrap();
        let b = Path::of_string("/a/b/d").unwrap();
        assert_eq!(b.to_string(), "/a/b/d");
        assert_eq!(a.common_prefix(&b).to_string(), "/a/b");
    }

    #[derive(Clone, Debug)]
    struct ValidPathString(String);

    impl Arbitrary for ValidPathString {
        fn arbitrary(g: &mut Gen) -> ValidPathString {
            let alphabet: Vec<char> =
                "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-@"
                    .chars()
                    .collect();
            let n_elements = (usize::arbitrary(g) % 5) + 1;
            let mut elements = Vec::new();
            for _ in 0..n_elements {
                let n_chars = (usize::arbitrary(g) % 6) + 1;
                let elem: String = (0..n_chars)
                    .map(|_| alphabet[usize::arbitrary(g) % alphabet.len()])
                    .collect();
                elements.push(elem);
            }
            let absolute = bool::arbitrary(g);
            let joined = elements.join("/");
            ValidPathString(if absolute {
                format!("/{}", joined)
            } else {
                joined
            })
        }
    }

    #[test]
    fn path_round_trip_property() {
        fn prop(s: ValidPathString) -> bool {
            let p = Path::of_string(&s.0).unwrap();
            p.to_string() == s.0
        }
        quickcheck(prop as fn(ValidPathString) -> bool);
    }
}
