use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond order string: '{0}'")]
pub struct ParseBondOrderError(String);

/// Elements that appear in drug-like organic molecules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Na = 11,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    K = 19,
    Se = 34,
    Br = 35,
    I = 53,
}

impl Element {
    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    #[inline]
    pub fn is_heavy(&self) -> bool {
        !matches!(self, Element::H)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    /// Allowed neutral valences, smallest first.
    pub fn valences(&self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br | Element::I => &[1],
            Element::Na | Element::K => &[1],
            Element::Si => &[4],
            Element::P => &[3, 5],
            Element::S | Element::Se => &[2, 4, 6],
        }
    }

    /// Covalent radius in Ångströms.
    pub fn covalent_radius(&self) -> f64 {
        match self {
            Element::H => 0.31,
            Element::B => 0.84,
            Element::C => 0.76,
            Element::N => 0.71,
            Element::O => 0.66,
            Element::F => 0.57,
            Element::Na => 1.66,
            Element::Si => 1.11,
            Element::P => 1.07,
            Element::S => 1.05,
            Element::Cl => 1.02,
            Element::K => 2.03,
            Element::Se => 1.20,
            Element::Br => 1.20,
            Element::I => 1.39,
        }
    }

    /// Whether the element may be written without brackets in SMILES.
    pub fn is_organic_subset(&self, aromatic: bool) -> bool {
        if aromatic {
            matches!(
                self,
                Element::B | Element::C | Element::N | Element::O | Element::P | Element::S
            )
        } else {
            matches!(
                self,
                Element::B
                    | Element::C
                    | Element::N
                    | Element::O
                    | Element::P
                    | Element::S
                    | Element::F
                    | Element::Cl
                    | Element::Br
                    | Element::I
            )
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" => Ok(Element::H),
            "B" => Ok(Element::B),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "F" => Ok(Element::F),
            "Na" => Ok(Element::Na),
            "Si" => Ok(Element::Si),
            "P" => Ok(Element::P),
            "S" => Ok(Element::S),
            "Cl" => Ok(Element::Cl),
            "K" => Ok(Element::K),
            "Se" => Ok(Element::Se),
            "Br" => Ok(Element::Br),
            "I" => Ok(Element::I),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    pub fn value(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// Number of hydrogens needed to cap the open valence left by cutting this bond.
    pub fn capping_hydrogens(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    pub(crate) fn code(&self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic => 4,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => f.write_str("Single"),
            BondOrder::Double => f.write_str("Double"),
            BondOrder::Triple => f.write_str("Triple"),
            BondOrder::Aromatic => f.write_str("Aromatic"),
        }
    }
}

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "1" | "-" => Ok(BondOrder::Single),
            "double" | "2" | "=" => Ok(BondOrder::Double),
            "triple" | "3" | "#" => Ok(BondOrder::Triple),
            "aromatic" | "ar" | ":" => Ok(BondOrder::Aromatic),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_symbols_roundtrip() {
        for el in [Element::C, Element::N, Element::Cl, Element::Br, Element::Se] {
            assert_eq!(el.symbol().parse::<Element>().unwrap(), el);
        }
        assert!("Xx".parse::<Element>().is_err());
    }

    #[test]
    fn atomic_numbers_match_periodic_table() {
        assert_eq!(Element::H.atomic_number(), 1);
        assert_eq!(Element::N.atomic_number(), 7);
        assert_eq!(Element::I.atomic_number(), 53);
    }

    #[test]
    fn organic_subset_depends_on_aromaticity() {
        assert!(Element::Cl.is_organic_subset(false));
        assert!(!Element::Cl.is_organic_subset(true));
        assert!(Element::N.is_organic_subset(true));
        assert!(!Element::Na.is_organic_subset(false));
    }

    #[test]
    fn bond_order_parsing_accepts_symbols() {
        assert_eq!("=".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("Aromatic".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
        assert!("quadruple".parse::<BondOrder>().is_err());
    }

    #[test]
    fn capping_hydrogens_follow_bond_order() {
        assert_eq!(BondOrder::Single.capping_hydrogens(), 1);
        assert_eq!(BondOrder::Double.capping_hydrogens(), 2);
        assert_eq!(BondOrder::Triple.capping_hydrogens(), 3);
    }
}
