use std::collections::BTreeSet;

use super::default_implicit_hydrogens;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

/// Options controlling SMILES output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write `:n` atom-map suffixes for mapped atoms.
    pub atom_maps: bool,
}

/// Canonical SMILES without atom maps; the identity string of a structure.
pub fn canonical_smiles(mol: &Molecule) -> String {
    write_smiles(mol, &WriteOptions::default())
}

/// Canonical SMILES keeping atom-map indices.
pub fn mapped_smiles(mol: &Molecule) -> String {
    write_smiles(mol, &WriteOptions { atom_maps: true })
}

pub fn write_smiles(mol: &Molecule, options: &WriteOptions) -> String {
    if mol.atom_count() == 0 {
        return String::new();
    }

    let ranks = canonical_ranks(mol, options.atom_maps);
    let tree = SpanningTree::build(mol, &ranks);

    let mut writer = Writer {
        mol,
        options,
        ranks: &ranks,
        tree: &tree,
        open_rings: Vec::new(),
        out: String::new(),
    };
    for (n, &root) in tree.roots.iter().enumerate() {
        if n > 0 {
            writer.out.push('.');
        }
        writer.write_branch(root);
    }
    writer.out
}

/// Canonical atom ranks (`0..n`, all distinct).
///
/// Initial classes come from local invariants and are refined by neighbor
/// classes until stable. Remaining ties are broken by splitting the smallest
/// tied class and refining again.
pub(crate) fn canonical_ranks(mol: &Molecule, with_maps: bool) -> Vec<usize> {
    let n = mol.atom_count();
    let adj = mol.adjacency();

    let invariants: Vec<(u8, usize, u8, i8, bool, u32)> = (0..n)
        .map(|i| {
            let atom = &mol.atoms[i];
            (
                atom.atomic_number(),
                adj[i].len(),
                atom.implicit_hydrogens,
                atom.formal_charge,
                atom.aromatic,
                if with_maps { atom.map_idx } else { 0 },
            )
        })
        .collect();
    let mut ranks = dense_ranks(&invariants);
    refine(&mut ranks, &adj, mol);

    loop {
        let classes = ranks.iter().collect::<BTreeSet<_>>().len();
        if classes == n {
            break;
        }
        // Smallest rank value shared by more than one atom.
        let mut counts = vec![0usize; n];
        for &r in &ranks {
            counts[r] += 1;
        }
        let Some(tied) = (0..n).find(|&r| counts[r] > 1) else {
            break;
        };
        let Some(chosen) = (0..n).find(|&i| ranks[i] == tied) else {
            break;
        };
        let keys: Vec<(usize, bool)> = (0..n).map(|i| (ranks[i], i != chosen)).collect();
        ranks = dense_ranks(&keys);
        refine(&mut ranks, &adj, mol);
    }

    ranks
}

fn refine(ranks: &mut Vec<usize>, adj: &[Vec<(usize, usize)>], mol: &Molecule) {
    let mut classes = ranks.iter().collect::<BTreeSet<_>>().len();
    loop {
        let keys: Vec<(usize, Vec<(usize, u8)>)> = adj
            .iter()
            .enumerate()
            .map(|(i, nbrs)| {
                let mut env: Vec<(usize, u8)> = nbrs
                    .iter()
                    .map(|&(nbr, bi)| (ranks[nbr], mol.bonds[bi].order.code()))
                    .collect();
                env.sort_unstable();
                (ranks[i], env)
            })
            .collect();
        let next = dense_ranks(&keys);
        let next_classes = next.iter().collect::<BTreeSet<_>>().len();
        *ranks = next;
        if next_classes == classes {
            break;
        }
        classes = next_classes;
    }
}

fn dense_ranks<K: Ord>(keys: &[K]) -> Vec<usize> {
    let sorted: BTreeSet<&K> = keys.iter().collect();
    let order: Vec<&K> = sorted.into_iter().collect();
    keys.iter()
        .map(|k| order.binary_search(&k).unwrap_or_default())
        .collect()
}

/// Depth-first spanning forest in rank order, with ring-closure bonds.
struct SpanningTree {
    roots: Vec<usize>,
    children: Vec<Vec<(usize, usize)>>,
    /// Ring-closure bonds per atom as `(other atom, bond index)`.
    closures: Vec<Vec<(usize, usize)>>,
}

impl SpanningTree {
    fn build(mol: &Molecule, ranks: &[usize]) -> Self {
        let n = mol.atom_count();
        let mut adj = mol.adjacency();
        for nbrs in &mut adj {
            nbrs.sort_by_key(|&(nbr, _)| ranks[nbr]);
        }

        let mut tree = Self {
            roots: Vec::new(),
            children: vec![Vec::new(); n],
            closures: vec![Vec::new(); n],
        };
        let mut visited = vec![false; n];
        let mut tree_bond = vec![false; mol.bond_count()];
        let mut closure_bond = vec![false; mol.bond_count()];

        let mut by_rank: Vec<usize> = (0..n).collect();
        by_rank.sort_by_key(|&i| ranks[i]);

        for start in by_rank {
            if visited[start] {
                continue;
            }
            tree.roots.push(start);
            tree.visit(start, &adj, &mut visited, &mut tree_bond, &mut closure_bond);
        }
        tree
    }

    fn visit(
        &mut self,
        atom: usize,
        adj: &[Vec<(usize, usize)>],
        visited: &mut [bool],
        tree_bond: &mut [bool],
        closure_bond: &mut [bool],
    ) {
        visited[atom] = true;
        for &(nbr, bi) in &adj[atom] {
            if tree_bond[bi] || closure_bond[bi] {
                continue;
            }
            if visited[nbr] {
                closure_bond[bi] = true;
                self.closures[nbr].push((atom, bi));
                self.closures[atom].push((nbr, bi));
            } else {
                tree_bond[bi] = true;
                self.children[atom].push((nbr, bi));
                self.visit(nbr, adj, visited, tree_bond, closure_bond);
            }
        }
    }
}

struct Writer<'a> {
    mol: &'a Molecule,
    options: &'a WriteOptions,
    ranks: &'a [usize],
    tree: &'a SpanningTree,
    /// Ring digit currently assigned to each open closure bond.
    open_rings: Vec<(usize, u16)>,
    out: String,
}

impl Writer<'_> {
    fn write_branch(&mut self, atom: usize) {
        self.write_atom(atom);
        self.write_ring_closures(atom);

        let children = &self.tree.children[atom];
        let last = children.len().saturating_sub(1);
        for (k, &(child, bi)) in children.iter().enumerate() {
            let branch = k < last;
            if branch {
                self.out.push('(');
            }
            self.write_bond(bi);
            self.write_branch(child);
            if branch {
                self.out.push(')');
            }
        }
    }

    fn write_ring_closures(&mut self, atom: usize) {
        let mut closures = self.tree.closures[atom].clone();
        closures.sort_by_key(|&(other, _)| self.ranks[other]);

        for (_, bi) in closures {
            if let Some(pos) = self.open_rings.iter().position(|&(b, _)| b == bi) {
                let (_, digit) = self.open_rings.remove(pos);
                self.push_ring_digit(digit);
            } else {
                let digit = (1..)
                    .find(|d| self.open_rings.iter().all(|&(_, used)| used != *d))
                    .unwrap_or(1);
                self.open_rings.push((bi, digit));
                self.write_bond(bi);
                self.push_ring_digit(digit);
            }
        }
    }

    fn push_ring_digit(&mut self, digit: u16) {
        if digit < 10 {
            self.out.push(char::from(b'0' + digit as u8));
        } else {
            self.out.push('%');
            self.out.push_str(&digit.to_string());
        }
    }

    fn write_bond(&mut self, bond_idx: usize) {
        let bond = &self.mol.bonds[bond_idx];
        let both_aromatic = self.mol.atoms[bond.i].aromatic && self.mol.atoms[bond.j].aromatic;
        match bond.order {
            BondOrder::Single if both_aromatic => self.out.push('-'),
            BondOrder::Single => {}
            BondOrder::Double => self.out.push('='),
            BondOrder::Triple => self.out.push('#'),
            BondOrder::Aromatic if both_aromatic => {}
            BondOrder::Aromatic => self.out.push(':'),
        }
    }

    fn write_atom(&mut self, idx: usize) {
        let atom = &self.mol.atoms[idx];
        let symbol = atom.element.symbol();
        let symbol = if atom.aromatic {
            symbol.to_ascii_lowercase()
        } else {
            symbol.to_string()
        };

        let orders = self
            .mol
            .bonds
            .iter()
            .filter(|b| b.touches(idx))
            .map(|b| b.order);
        let default_h = default_implicit_hydrogens(atom.element, atom.aromatic, orders);
        let show_map = self.options.atom_maps && atom.is_mapped();

        let bracket = atom.formal_charge != 0
            || !atom.element.is_organic_subset(atom.aromatic)
            || show_map
            || atom.implicit_hydrogens != default_h;

        if !bracket {
            self.out.push_str(&symbol);
            return;
        }

        self.out.push('[');
        self.out.push_str(&symbol);
        match atom.implicit_hydrogens {
            0 => {}
            1 => self.out.push('H'),
            h => {
                self.out.push('H');
                self.out.push_str(&h.to_string());
            }
        }
        match atom.formal_charge {
            0 => {}
            1 => self.out.push('+'),
            -1 => self.out.push('-'),
            c if c > 0 => self.out.push_str(&format!("+{c}")),
            c => self.out.push_str(&format!("-{}", -(c as i16))),
        }
        if show_map {
            self.out.push(':');
            self.out.push_str(&atom.map_idx.to_string());
        }
        self.out.push(']');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn canon(smiles: &str) -> String {
        canonical_smiles(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn equivalent_inputs_share_one_canonical_form() {
        assert_eq!(canon("OCC"), canon("CCO"));
        assert_eq!(canon("c1ccccc1O"), canon("Oc1ccccc1"));
        assert_eq!(canon("C(=O)(N)c1ccccc1"), canon("NC(=O)c1ccccc1"));
        assert_eq!(canon("c1ccncc1"), canon("n1ccccc1"));
    }

    #[test]
    fn different_structures_differ() {
        assert_ne!(canon("CCO"), canon("CCN"));
        assert_ne!(canon("Cc1ccccc1O"), canon("Cc1ccc(O)cc1"));
    }

    #[test]
    fn canonical_output_round_trips() {
        for smiles in [
            "CC(=O)Nc1ccc(O)cc1",
            "c1ccc(-c2ccccc2)cc1",
            "C[N+](C)(C)c1ccccc1",
            "[O-][N+](=O)c1ccccc1",
            "c1cc[nH]c1",
            "C#N",
            "C1CC2CCC1CC2",
        ] {
            let once = canon(smiles);
            assert_eq!(canon(&once), once, "unstable canonical form for {smiles}");
        }
    }

    #[test]
    fn maps_are_written_only_when_requested() {
        let mol = parse_smiles("[CH3:1][CH2:2][OH:3]").unwrap();
        assert_eq!(canonical_smiles(&mol), "CCO");
        let mapped = mapped_smiles(&mol);
        assert!(mapped.contains(":1]"));
        assert!(mapped.contains(":3]"));
        let back = parse_smiles(&mapped).unwrap();
        assert_eq!(back.atom_by_map(3).map(|i| back.atoms[i].implicit_hydrogens), Some(1));
    }

    #[test]
    fn charges_and_hydrogens_are_bracketed() {
        let s = canon("[NH3+]CC(=O)[O-]");
        assert!(s.contains("[NH3+]"));
        assert!(s.contains("[O-]"));
    }

    #[test]
    fn disconnected_components_are_dot_separated() {
        let s = canon("[Na+].[Cl-]");
        assert_eq!(s.matches('.').count(), 1);
    }

    #[test]
    fn ranks_are_a_permutation() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        let mut ranks = canonical_ranks(&mol, false);
        ranks.sort_unstable();
        assert_eq!(ranks, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn empty_molecule_writes_empty_string() {
        assert_eq!(canonical_smiles(&Molecule::new()), "");
    }
}
