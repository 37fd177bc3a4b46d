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

//! Names: predefined watch sentinels, and absolute/relative paths.

use crate::error::Error;
use crate::path::Path;

/// The predefined watch sentinels, reserved outside the store namespace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Predefined {
    IntroduceDomain,
    ReleaseDomain,
}

impl Predefined {
    fn as_str(self) -> &'static str {
        match self {
            Predefined::IntroduceDomain => "@introduceDomain",
            Predefined::ReleaseDomain => "@releaseDomain",
        }
    }
}

/// A watch or store name: one of the predefined sentinels, or an
/// absolute/relative store path.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Name {
    Predefined(Predefined),
    Absolute(Path),
    Relative(Path),
}

impl Name {
    /// Parse a name string, recognizing the predefined sentinels exactly and
    /// otherwise discriminating absolute (leading `/`) from relative paths.
    pub fn of_string(s: &str) -> Result<Name, Error> {
        match s {
            "@introduceDomain" => Ok(Name::Predefined(Predefined::IntroduceDomain)),
            "@releaseDomain" => Ok(Name::Predefined(Predefined::ReleaseDomain)),
            _ if s.starts_with('/') => Ok(Name::Absolute(Path::of_string(s)?)),
            _ => Ok(Name::Relative(Path::of_string(s)?)),
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Name::Predefined(p) => p.as_str().to_string(),
            // `p` is always absolute (parsed from a `/`-prefixed string in
            // `of_string`), so its own `to_string` already carries the `/`
            // for every non-root path. The bare root is the one case `Path`
            // itself normalizes away to the empty string; restore the `/`
            // here, since an absolute `Name` for the store root is still "/".
            Name::Absolute(p) if p.is_root() => "/".to_string(),
            Name::Absolute(p) => p.to_string(),
            Name::Relative(p) => p.to_string(),
        }
    }

    /// If `self` is relative and `relative_to` is absolute, anchor it there;
    /// otherwise return `self` unchanged.
    pub fn resolve(&self, relative_to: &Name) -> Name {
        match (self, relative_to) {
            (Name::Relative(rel), Name::Absolute(base)) => Name::Absolute(base.append(rel)),
            _ => self.clone(),
        }
    }

    /// If `self` and `base` are both absolute and `base` is a prefix of
    /// `self`, return the remainder as a relative name; otherwise return
    /// `self` unchanged.
    pub fn relative(&self, base: &Name) -> Name {
        match (self, base) {
            (Name::Absolute(t), Name::Absolute(b)) => match t.strip_prefix(b) {
                Some(rest) => Name::Relative(rest),
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_round_trips() {
        assert_eq!(
            Name::of_string("@introduceDomain").unwrap(),
            Name::Predefined(Predefined::IntroduceDomain)
        );
        assert_eq!(
            Name::of_string("@releaseDomain").unwrap().to_string(),
            "@releaseDomain"
        );
    }

    #[test]
    fn absolute_vs_relative() {
        assert!(matches!(
            Name::of_string("/local/domain").unwrap(),
            Name::Absolute(_)
        ));
        assert!(matches!(
            Name::of_string("local/domain").unwrap(),
            Name::Relative(_)
        ));
    }

    #[test]
    fn resolve_anchors_relative_name() {
        let base = Name::of_string("/local/domain/1").unwrap();
        let rel = Name::of_string("data").unwrap();
        let resolved = rel.resolve(&base);
        assert_eq!(resolved.to_string(), "/local/domain/1/data");
    }

    #[test]
    fn resolve_is_identity_for_absolute() {
        let base = Name::of_string("/local/domain/1").unwrap();
        let abs = Name::of_string("/other/path").unwrap();
        assert_eq!(abs.resolve(&base), abs);
    }

    #[test]
    fn relative_and_resolve_are_inverse_when_base_is_prefix() {
        let base = Name::of_string("/local/domain/1").unwrap();
        let t = Name::of_string("/local/domain/1/data/x").unwrap();
        let rel = t.relative(&base);
        assert!(matches!(rel, Name::Relative(_)));
        assert_eq!(rel.resolve(&base), t);
    }

    #[test]
    fn relative_is_identity_when_base_is_not_prefix() {
        let base = Name::of_string("/local/domain/1").unwrap();
        let t = Name::of_string("/other/path").unwrap();
        assert_eq!(t.relative(&base), t);
    }
}
