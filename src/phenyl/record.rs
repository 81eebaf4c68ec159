//! Structured view of a benchmark molecule's title.
//!
//! Titles are underscore-delimited, e.g. `phenyl_fluoro_amino`: the first
//! token names the scaffold, the last token the `R1` substituent and, in
//! titles with an `R2` variant, the second token the `R2` substituent.
//! A title is decoded once into a [`RingRecord`].

use std::fmt;

/// Where a substituent sits on the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubstituentSite {
    /// Named by the last title token.
    R1,
    /// Named by the second title token.
    R2,
}

impl SubstituentSite {
    /// Map indices of the ring atoms the substituent bond may touch.
    pub fn anchor_maps(&self) -> &'static [u32] {
        match self {
            SubstituentSite::R1 => &[1],
            SubstituentSite::R2 => &[2, 3],
        }
    }

    /// Map indices checked for a ring nitrogen next to the substituent.
    pub fn ortho_maps(&self) -> &'static [u32] {
        match self {
            SubstituentSite::R1 => &[1, 4, 5],
            SubstituentSite::R2 => &[2, 3, 4, 5],
        }
    }
}

impl fmt::Display for SubstituentSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstituentSite::R1 => f.write_str("R1"),
            SubstituentSite::R2 => f.write_str("R2"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingRecord {
    pub title: String,
    pub tokens: Vec<String>,
}

impl RingRecord {
    pub fn parse(title: &str) -> Self {
        Self {
            title: title.to_string(),
            tokens: title.split('_').map(str::to_string).collect(),
        }
    }

    pub fn scaffold(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or_default()
    }

    /// Whether `group` is any token of the title.
    pub fn mentions(&self, group: &str) -> bool {
        self.tokens.iter().any(|t| t == group)
    }

    /// Site of `group`; the `R1` position wins when both match.
    pub fn site_of(&self, group: &str) -> Option<SubstituentSite> {
        if self.tokens.last().is_some_and(|t| t == group) {
            Some(SubstituentSite::R1)
        } else if self.tokens.get(1).is_some_and(|t| t == group) {
            Some(SubstituentSite::R2)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_token_is_r1() {
        let record = RingRecord::parse("phenyl_fluoro_amino");
        assert_eq!(record.scaffold(), "phenyl");
        assert_eq!(record.site_of("amino"), Some(SubstituentSite::R1));
        assert_eq!(record.site_of("fluoro"), Some(SubstituentSite::R2));
        assert_eq!(record.site_of("nitro"), None);
    }

    #[test]
    fn r1_takes_precedence() {
        let record = RingRecord::parse("pyridine_amino");
        assert_eq!(record.site_of("amino"), Some(SubstituentSite::R1));
    }

    #[test]
    fn middle_tokens_have_no_site() {
        let record = RingRecord::parse("pyridine_ortho_methyl_hydroxy");
        assert!(record.mentions("methyl"));
        assert_eq!(record.site_of("methyl"), None);
        assert_eq!(record.site_of("ortho"), Some(SubstituentSite::R2));
    }

    #[test]
    fn site_map_lists() {
        assert_eq!(SubstituentSite::R1.anchor_maps(), &[1]);
        assert_eq!(SubstituentSite::R2.ortho_maps(), &[2, 3, 4, 5]);
        assert_eq!(SubstituentSite::R2.to_string(), "R2");
    }
}
