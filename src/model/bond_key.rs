use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond reference: '{0}' (expected two atom map indices such as \"3-7\")")]
pub struct ParseBondKeyError(String);

/// A bond identified by the atom-map indices of its two atoms.
///
/// The pair is always stored with the smaller index first, so `(7, 3)` and
/// `(3, 7)` compare, hash and serialize identically. Every bond lookup in the
/// crate goes through this type; callers never need to try the reversed pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondKey {
    lo: u32,
    hi: u32,
}

impl BondKey {
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    #[inline]
    pub fn first(&self) -> u32 {
        self.lo
    }

    #[inline]
    pub fn second(&self) -> u32 {
        self.hi
    }

    #[inline]
    pub fn contains(&self, map_idx: u32) -> bool {
        self.lo == map_idx || self.hi == map_idx
    }
}

impl From<(u32, u32)> for BondKey {
    fn from((a, b): (u32, u32)) -> Self {
        Self::new(a, b)
    }
}

impl From<[u32; 2]> for BondKey {
    fn from([a, b]: [u32; 2]) -> Self {
        Self::new(a, b)
    }
}

impl fmt::Display for BondKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

impl FromStr for BondKey {
    type Err = ParseBondKeyError;

    /// Accepts `"3-7"`, `"(3, 7)"` and `"[3, 7]"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseBondKeyError(s.to_string());
        let inner = s
            .trim()
            .trim_start_matches(['(', '['])
            .trim_end_matches([')', ']']);

        let mut parts = inner
            .split(|c: char| c == '-' || c == ',')
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let a = parts.next().ok_or_else(err)?.parse::<u32>().map_err(|_| err())?;
        let b = parts.next().ok_or_else(err)?.parse::<u32>().map_err(|_| err())?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self::new(a, b))
    }
}

impl Serialize for BondKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BondKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_does_not_matter() {
        assert_eq!(BondKey::new(7, 3), BondKey::new(3, 7));
        assert_eq!(BondKey::from((9, 2)).first(), 2);
        assert_eq!(BondKey::from([9, 2]).second(), 9);
    }

    #[test]
    fn parses_all_serialized_forms() {
        let expected = BondKey::new(1, 2);
        assert_eq!("1-2".parse::<BondKey>().unwrap(), expected);
        assert_eq!("2-1".parse::<BondKey>().unwrap(), expected);
        assert_eq!("(2, 1)".parse::<BondKey>().unwrap(), expected);
        assert_eq!("[1, 2]".parse::<BondKey>().unwrap(), expected);
    }

    #[test]
    fn rejects_malformed_references() {
        assert!("1".parse::<BondKey>().is_err());
        assert!("1-2-3".parse::<BondKey>().is_err());
        assert!("a-b".parse::<BondKey>().is_err());
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(BondKey::new(12, 4).to_string(), "4-12");
    }

    #[test]
    fn serde_uses_string_form() {
        let key = BondKey::new(5, 3);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"3-5\"");
        let back: BondKey = serde_json::from_str("\"5-3\"").unwrap();
        assert_eq!(back, key);
    }
}
