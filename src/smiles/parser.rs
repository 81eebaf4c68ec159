use std::collections::BTreeMap;

use super::{Error, default_implicit_hydrogens};
use crate::model::atom::Atom;
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::{BondOrder, Element};
use crate::perception::rings::RingInfo;

/// Parses a SMILES string into a hydrogen-suppressed [`Molecule`].
pub fn parse_smiles(smiles: &str) -> Result<Molecule, Error> {
    let smiles = smiles.trim();
    if smiles.is_empty() {
        return Err(Error::Empty);
    }

    let mut parser = SmilesParser::new(smiles);
    parser.parse()?;
    parser.finish()
}

/// Parses one line of a `.smi` file: a SMILES string optionally followed by
/// whitespace and a title.
pub fn parse_smiles_line(line: &str) -> Result<Molecule, Error> {
    let line = line.trim();
    let (smiles, title) = match line.split_once(char::is_whitespace) {
        Some((smiles, rest)) => (smiles, rest.trim()),
        None => (line, ""),
    };
    Ok(parse_smiles(smiles)?.with_title(title))
}

struct SmilesParser<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    /// Whether each atom was written in brackets (its hydrogen count is explicit).
    bracketed: Vec<bool>,
    bonds: Vec<Bond>,
    ring_closures: BTreeMap<u16, (usize, Option<BondOrder>)>,
    branches: Vec<Option<usize>>,
    prev: Option<usize>,
    /// Bond symbol awaiting its second atom, with its position.
    pending_bond: Option<(BondOrder, usize)>,
}

impl<'a> SmilesParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bracketed: Vec::new(),
            bonds: Vec::new(),
            ring_closures: BTreeMap::new(),
            branches: Vec::new(),
            prev: None,
            pending_bond: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn parse(&mut self) -> Result<(), Error> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    if self.prev.is_none() {
                        return Err(Error::UnbalancedBranch { pos: self.pos });
                    }
                    self.advance();
                    self.branches.push(self.prev);
                }
                b')' => {
                    let pos = self.pos;
                    self.reject_pending()?;
                    self.advance();
                    self.prev = self
                        .branches
                        .pop()
                        .ok_or(Error::UnbalancedBranch { pos })?;
                    self.pending_bond = None;
                }
                b'-' => self.set_pending(BondOrder::Single)?,
                b'=' => self.set_pending(BondOrder::Double)?,
                b'#' => self.set_pending(BondOrder::Triple)?,
                b':' => self.set_pending(BondOrder::Aromatic)?,
                b'/' | b'\\' => {
                    self.advance();
                }
                b'.' => {
                    self.reject_pending()?;
                    self.advance();
                    self.prev = None;
                    self.pending_bond = None;
                }
                b'%' => {
                    let pos = self.pos;
                    self.advance();
                    let ring = self.two_digit_ring(pos)?;
                    self.ring_closure(ring, pos)?;
                }
                b'0'..=b'9' => {
                    let pos = self.pos;
                    self.advance();
                    self.ring_closure((ch - b'0') as u16, pos)?;
                }
                b'[' => self.bracket_atom()?,
                _ if is_organic_start(ch) => self.organic_atom()?,
                _ => {
                    return Err(Error::UnexpectedChar {
                        ch: ch as char,
                        pos: self.pos,
                    });
                }
            }
        }
        self.reject_pending()
    }

    fn set_pending(&mut self, order: BondOrder) -> Result<(), Error> {
        let pos = self.pos;
        if self.prev.is_none() || self.pending_bond.is_some() {
            return Err(Error::DanglingBond { pos });
        }
        self.advance();
        self.pending_bond = Some((order, pos));
        Ok(())
    }

    /// A bond symbol must be followed by an atom or a ring closure.
    fn reject_pending(&self) -> Result<(), Error> {
        match self.pending_bond {
            Some((_, pos)) => Err(Error::DanglingBond { pos }),
            None => Ok(()),
        }
    }

    fn organic_atom(&mut self) -> Result<(), Error> {
        let pos = self.pos;
        let ch = self.advance().unwrap_or_default();
        let aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        let symbol = match (upper, aromatic, self.peek()) {
            (b'B', false, Some(b'r')) => "Br",
            (b'C', false, Some(b'l')) => "Cl",
            (b'B', ..) => "B",
            (b'C', ..) => "C",
            (b'N', ..) => "N",
            (b'O', ..) => "O",
            (b'P', ..) => "P",
            (b'S', ..) => "S",
            (b'F', false, _) => "F",
            (b'I', false, _) => "I",
            _ => {
                return Err(Error::UnknownElement {
                    symbol: (ch as char).to_string(),
                    pos,
                });
            }
        };
        if symbol.len() == 2 {
            self.advance();
        }

        let element = element_at(symbol, pos)?;
        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        self.push_atom(atom, false);
        Ok(())
    }

    fn bracket_atom(&mut self) -> Result<(), Error> {
        let start = self.pos;
        self.advance();

        // Isotope labels are accepted but not retained.
        self.number()?;

        let first = self
            .advance()
            .ok_or(Error::UnclosedBracket { pos: start })?;
        if !first.is_ascii_alphabetic() {
            return Err(Error::UnexpectedChar {
                ch: first as char,
                pos: self.pos - 1,
            });
        }
        let aromatic = first.is_ascii_lowercase();
        let upper = (first.to_ascii_uppercase()) as char;

        let symbol = match self.peek() {
            Some(next) if next.is_ascii_lowercase() => {
                let two = format!("{}{}", upper, next as char);
                if two.parse::<Element>().is_ok() {
                    self.advance();
                    two
                } else {
                    upper.to_string()
                }
            }
            _ => upper.to_string(),
        };
        let element = element_at(&symbol, start + 1)?;

        while self.peek() == Some(b'@') {
            self.advance();
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.advance();
            let pos = self.pos;
            hydrogens = match self.number()? {
                Some(n) => u8::try_from(n).map_err(|_| Error::NumberTooLarge { pos })?,
                None => 1,
            };
        }

        let mut charge = 0i8;
        if let Some(sign @ (b'+' | b'-')) = self.peek() {
            self.advance();
            let unit: i8 = if sign == b'+' { 1 } else { -1 };
            let pos = self.pos;
            charge = match self.number()? {
                Some(n) => i8::try_from(n)
                    .map(|n| unit * n)
                    .map_err(|_| Error::NumberTooLarge { pos })?,
                None => {
                    let mut c = unit;
                    while self.peek() == Some(sign) {
                        self.advance();
                        c += unit;
                    }
                    c
                }
            };
        }

        let mut map_idx = 0u32;
        if self.peek() == Some(b':') {
            self.advance();
            map_idx = self.number()?.unwrap_or(0);
        }

        if self.advance() != Some(b']') {
            return Err(Error::UnclosedBracket { pos: start });
        }

        let mut atom = Atom::new(element)
            .with_hydrogens(hydrogens)
            .with_charge(charge)
            .with_map_idx(map_idx);
        atom.aromatic = aromatic;
        self.push_atom(atom, true);
        Ok(())
    }

    fn number(&mut self) -> Result<Option<u32>, Error> {
        let pos = self.pos;
        let mut value: Option<u32> = None;
        while let Some(d @ b'0'..=b'9') = self.peek() {
            self.advance();
            value = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add((d - b'0') as u32))
                .map(Some)
                .ok_or(Error::NumberTooLarge { pos })?;
        }
        Ok(value)
    }

    fn two_digit_ring(&mut self, pos: usize) -> Result<u16, Error> {
        let mut digits = [0u8; 2];
        for d in &mut digits {
            match self.advance() {
                Some(c @ b'0'..=b'9') => *d = c - b'0',
                Some(c) => {
                    return Err(Error::UnexpectedChar {
                        ch: c as char,
                        pos: self.pos - 1,
                    });
                }
                None => return Err(Error::DanglingRingClosure { pos }),
            }
        }
        Ok(digits[0] as u16 * 10 + digits[1] as u16)
    }

    fn ring_closure(&mut self, ring: u16, pos: usize) -> Result<(), Error> {
        let current = self.prev.ok_or(Error::DanglingRingClosure { pos })?;

        match self.ring_closures.remove(&ring) {
            Some((open, open_order)) => {
                let explicit = self.pending_bond.take().map(|(order, _)| order).or(open_order);
                let order = self.implied_order(open, current, explicit);
                self.bonds.push(Bond::new(open, current, order));
            }
            None => {
                let pending = self.pending_bond.take().map(|(order, _)| order);
                self.ring_closures.insert(ring, (current, pending));
            }
        }
        Ok(())
    }

    fn push_atom(&mut self, atom: Atom, bracketed: bool) {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        self.bracketed.push(bracketed);

        if let Some(prev) = self.prev {
            let explicit = self.pending_bond.take().map(|(order, _)| order);
            let order = self.implied_order(prev, idx, explicit);
            self.bonds.push(Bond::new(prev, idx, order));
        }
        self.pending_bond = None;
        self.prev = Some(idx);
    }

    fn implied_order(&self, a: usize, b: usize, explicit: Option<BondOrder>) -> BondOrder {
        explicit.unwrap_or(if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        })
    }

    fn finish(self) -> Result<Molecule, Error> {
        if !self.ring_closures.is_empty() {
            return Err(Error::UnmatchedRingClosure(
                self.ring_closures.keys().copied().collect(),
            ));
        }
        if !self.branches.is_empty() {
            return Err(Error::UnbalancedBranch {
                pos: self.input.len(),
            });
        }

        let mut mol = Molecule {
            title: String::new(),
            atoms: self.atoms,
            bonds: self.bonds,
        };

        demote_acyclic_aromatic_bonds(&mut mol);

        for (idx, bracketed) in self.bracketed.iter().enumerate() {
            if *bracketed {
                continue;
            }
            let atom = &mol.atoms[idx];
            let orders = mol.bonds.iter().filter(|b| b.touches(idx)).map(|b| b.order);
            let h = default_implicit_hydrogens(atom.element, atom.aromatic, orders);
            mol.atoms[idx].implicit_hydrogens = h;
        }

        Ok(fold_explicit_hydrogens(mol))
    }
}

/// Bonds between aromatic atoms of different rings (biaryl links) are single.
fn demote_acyclic_aromatic_bonds(mol: &mut Molecule) {
    let rings = RingInfo::perceive(mol);
    for (bi, bond) in mol.bonds.iter_mut().enumerate() {
        if bond.order == BondOrder::Aromatic && !rings.is_ring_bond(bi) {
            bond.order = BondOrder::Single;
        }
    }
}

/// Removes neutral hydrogen atoms bonded to exactly one heavy atom and adds
/// them to that atom's implicit hydrogen count.
fn fold_explicit_hydrogens(mol: Molecule) -> Molecule {
    let removable: Vec<bool> = (0..mol.atom_count())
        .map(|i| {
            let atom = &mol.atoms[i];
            if atom.element != Element::H || atom.formal_charge != 0 {
                return false;
            }
            let neighbors = mol.neighbors(i);
            neighbors.len() == 1 && mol.atoms[neighbors[0]].element.is_heavy()
        })
        .collect();

    if !removable.iter().any(|&r| r) {
        return mol;
    }

    let Molecule {
        title,
        mut atoms,
        bonds,
    } = mol;

    for bond in &bonds {
        if removable[bond.i] {
            atoms[bond.j].implicit_hydrogens += 1;
        } else if removable[bond.j] {
            atoms[bond.i].implicit_hydrogens += 1;
        }
    }

    let mut new_index = vec![usize::MAX; atoms.len()];
    let mut kept = Vec::with_capacity(atoms.len());
    for (i, atom) in atoms.into_iter().enumerate() {
        if !removable[i] {
            new_index[i] = kept.len();
            kept.push(atom);
        }
    }

    let bonds = bonds
        .into_iter()
        .filter(|b| !removable[b.i] && !removable[b.j])
        .map(|b| Bond {
            wbo: b.wbo,
            ..Bond::new(new_index[b.i], new_index[b.j], b.order)
        })
        .collect();

    Molecule {
        title,
        atoms: kept,
        bonds,
    }
}

fn element_at(symbol: &str, pos: usize) -> Result<Element, Error> {
    symbol.parse::<Element>().map_err(|_| Error::UnknownElement {
        symbol: symbol.to_string(),
        pos,
    })
}

fn is_organic_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I' | b'b' | b'c' | b'n' | b'o' | b'p'
            | b's'
    )
}
