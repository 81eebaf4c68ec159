use super::types::Element;

/// A heavy atom with its hydrogens folded into `implicit_hydrogens`.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub formal_charge: i8,
    pub aromatic: bool,
    pub implicit_hydrogens: u8,
    /// Atom-map index from a mapped SMILES; `0` means unmapped.
    pub map_idx: u32,
    /// Partial charge in elementary charge units (zero until assigned).
    pub partial_charge: f64,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            aromatic: false,
            implicit_hydrogens: 0,
            map_idx: 0,
            partial_charge: 0.0,
        }
    }

    pub fn with_map_idx(mut self, map_idx: u32) -> Self {
        self.map_idx = map_idx;
        self
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.implicit_hydrogens = count;
        self
    }

    pub fn with_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    pub fn aromatic(mut self) -> Self {
        self.aromatic = true;
        self
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.element.atomic_number()
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.map_idx != 0
    }
}
