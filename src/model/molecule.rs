use super::atom::Atom;
use super::bond_key::BondKey;
use super::types::BondOrder;

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
    /// Annotated Wiberg bond order, if one has been computed.
    pub wbo: Option<f64>,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order, wbo: None }
        } else {
            Self { i: idx2, j: idx1, order, wbo: None }
        }
    }

    #[inline]
    pub fn touches(&self, atom: usize) -> bool {
        self.i == atom || self.j == atom
    }

    /// The atom on the other end of the bond from `atom`.
    #[inline]
    pub fn other(&self, atom: usize) -> usize {
        if self.i == atom { self.j } else { self.i }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub title: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.element.is_heavy()).count()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn add_bond(&mut self, i: usize, j: usize, order: BondOrder) -> usize {
        self.bonds.push(Bond::new(i, j, order));
        self.bonds.len() - 1
    }

    /// Per-atom lists of `(neighbor, bond index)`.
    pub fn adjacency(&self) -> Vec<Vec<(usize, usize)>> {
        let mut adj = vec![Vec::new(); self.atoms.len()];
        for (bi, bond) in self.bonds.iter().enumerate() {
            adj[bond.i].push((bond.j, bi));
            adj[bond.j].push((bond.i, bi));
        }
        adj
    }

    pub fn neighbors(&self, atom: usize) -> Vec<usize> {
        self.bonds
            .iter()
            .filter(|b| b.touches(atom))
            .map(|b| b.other(atom))
            .collect()
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.bonds.iter().filter(|b| b.touches(atom)).count()
    }

    pub fn heavy_degree(&self, atom: usize) -> usize {
        self.bonds
            .iter()
            .filter(|b| b.touches(atom) && self.atoms[b.other(atom)].element.is_heavy())
            .count()
    }

    /// Sum of explicit bond orders, with aromatic bonds counted as 1.5.
    pub fn bond_order_sum(&self, atom: usize) -> f64 {
        self.bonds
            .iter()
            .filter(|b| b.touches(atom))
            .map(|b| b.order.value())
            .sum()
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.bonds
            .iter()
            .position(|bond| bond.touches(a) && bond.touches(b) && a != b)
    }

    pub fn atom_by_map(&self, map_idx: u32) -> Option<usize> {
        if map_idx == 0 {
            return None;
        }
        self.atoms.iter().position(|a| a.map_idx == map_idx)
    }

    /// Index of the bond whose atoms carry the two map indices of `key`.
    pub fn bond_by_key(&self, key: BondKey) -> Option<usize> {
        let a = self.atom_by_map(key.first())?;
        let b = self.atom_by_map(key.second())?;
        self.bond_between(a, b)
    }

    /// Map-index key of a bond, if both atoms are mapped.
    pub fn bond_key(&self, bond_idx: usize) -> Option<BondKey> {
        let bond = self.bonds.get(bond_idx)?;
        let (a, b) = (&self.atoms[bond.i], &self.atoms[bond.j]);
        (a.is_mapped() && b.is_mapped()).then(|| BondKey::new(a.map_idx, b.map_idx))
    }

    pub fn total_formal_charge(&self) -> i32 {
        self.atoms.iter().map(|a| a.formal_charge as i32).sum()
    }

    pub fn has_triple_bond(&self, atom: usize) -> bool {
        self.bonds
            .iter()
            .any(|b| b.touches(atom) && b.order == BondOrder::Triple)
    }

    pub fn clear_wbo(&mut self) {
        for bond in &mut self.bonds {
            bond.wbo = None;
        }
    }

    pub fn annotated_bond_count(&self) -> usize {
        self.bonds.iter().filter(|b| b.wbo.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;

    fn ethanol() -> Molecule {
        let mut mol = Molecule::new().with_title("ethanol");
        let c1 = mol.add_atom(Atom::new(Element::C).with_map_idx(1).with_hydrogens(3));
        let c2 = mol.add_atom(Atom::new(Element::C).with_map_idx(2).with_hydrogens(2));
        let o = mol.add_atom(Atom::new(Element::O).with_map_idx(3).with_hydrogens(1));
        mol.add_bond(c1, c2, BondOrder::Single);
        mol.add_bond(o, c2, BondOrder::Single);
        mol
    }

    #[test]
    fn bonds_are_normalized() {
        let bond = Bond::new(5, 2, BondOrder::Double);
        assert_eq!((bond.i, bond.j), (2, 5));
        assert_eq!(bond.other(2), 5);
    }

    #[test]
    fn lookup_by_map_index_is_orientation_free() {
        let mol = ethanol();
        assert_eq!(mol.bond_by_key(BondKey::new(3, 2)), Some(1));
        assert_eq!(mol.bond_by_key(BondKey::new(2, 3)), Some(1));
        assert_eq!(mol.bond_by_key(BondKey::new(1, 3)), None);
        assert_eq!(mol.bond_key(0), Some(BondKey::new(1, 2)));
    }

    #[test]
    fn unmapped_lookup_returns_none() {
        let mol = ethanol();
        assert_eq!(mol.atom_by_map(0), None);
    }

    #[test]
    fn degrees_and_counts() {
        let mol = ethanol();
        assert_eq!(mol.heavy_atom_count(), 3);
        assert_eq!(mol.degree(1), 2);
        assert_eq!(mol.heavy_degree(0), 1);
        assert_eq!(mol.neighbors(1), vec![0, 2]);
        assert!((mol.bond_order_sum(1) - 2.0).abs() < 1e-12);
    }
}
