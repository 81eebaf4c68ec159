use crate::model::molecule::Molecule;

/// Ring membership of a molecule's atoms and bonds.
///
/// A bond is a ring bond exactly when it is not a bridge of the molecular
/// graph. Ring systems are the connected components formed by ring bonds, so
/// fused and spiro rings end up in one system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingInfo {
    atom_in_ring: Vec<bool>,
    bond_in_ring: Vec<bool>,
    systems: Vec<Vec<usize>>,
    atom_system: Vec<Option<usize>>,
}

impl RingInfo {
    pub fn perceive(mol: &Molecule) -> Self {
        let n = mol.atom_count();
        let adj = mol.adjacency();
        let bridges = find_bridges(&adj, mol.bond_count());

        let bond_in_ring: Vec<bool> = bridges.iter().map(|&bridge| !bridge).collect();
        let mut atom_in_ring = vec![false; n];
        for (bi, bond) in mol.bonds.iter().enumerate() {
            if bond_in_ring[bi] {
                atom_in_ring[bond.i] = true;
                atom_in_ring[bond.j] = true;
            }
        }

        let mut atom_system = vec![None; n];
        let mut systems = Vec::new();
        for start in 0..n {
            if !atom_in_ring[start] || atom_system[start].is_some() {
                continue;
            }
            let id = systems.len();
            let mut members = vec![start];
            let mut stack = vec![start];
            atom_system[start] = Some(id);
            while let Some(atom) = stack.pop() {
                for &(nbr, bi) in &adj[atom] {
                    if bond_in_ring[bi] && atom_system[nbr].is_none() {
                        atom_system[nbr] = Some(id);
                        members.push(nbr);
                        stack.push(nbr);
                    }
                }
            }
            members.sort_unstable();
            systems.push(members);
        }

        Self {
            atom_in_ring,
            bond_in_ring,
            systems,
            atom_system,
        }
    }

    #[inline]
    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.atom_in_ring[atom]
    }

    #[inline]
    pub fn is_ring_bond(&self, bond: usize) -> bool {
        self.bond_in_ring[bond]
    }

    /// Atom indices of each ring system, sorted.
    pub fn systems(&self) -> &[Vec<usize>] {
        &self.systems
    }

    pub fn system_of(&self, atom: usize) -> Option<&[usize]> {
        self.atom_system[atom].map(|id| self.systems[id].as_slice())
    }

    /// Whether two atoms belong to the same ring system.
    pub fn same_system(&self, a: usize, b: usize) -> bool {
        matches!((self.atom_system[a], self.atom_system[b]), (Some(x), Some(y)) if x == y)
    }
}

/// Marks bridges with Tarjan's low-link numbering.
fn find_bridges(adj: &[Vec<(usize, usize)>], bond_count: usize) -> Vec<bool> {
    let n = adj.len();
    let mut disc = vec![usize::MAX; n];
    let mut low = vec![0usize; n];
    let mut bridges = vec![false; bond_count];
    let mut timer = 0usize;

    for root in 0..n {
        if disc[root] != usize::MAX {
            continue;
        }
        // (atom, bond used to reach it, next neighbor cursor)
        let mut stack: Vec<(usize, Option<usize>, usize)> = vec![(root, None, 0)];
        disc[root] = timer;
        low[root] = timer;
        timer += 1;

        while let Some(frame) = stack.last_mut() {
            let (atom, via, cursor) = *frame;
            if cursor < adj[atom].len() {
                frame.2 += 1;
                let (nbr, bi) = adj[atom][cursor];
                if Some(bi) == via {
                    continue;
                }
                if disc[nbr] == usize::MAX {
                    disc[nbr] = timer;
                    low[nbr] = timer;
                    timer += 1;
                    stack.push((nbr, Some(bi), 0));
                } else {
                    low[atom] = low[atom].min(disc[nbr]);
                }
            } else {
                stack.pop();
                if let (Some(bi), Some(&(parent, _, _))) = (via, stack.last()) {
                    low[parent] = low[parent].min(low[atom]);
                    if low[atom] > disc[parent] {
                        bridges[bi] = true;
                    }
                }
            }
        }
    }

    bridges
}
