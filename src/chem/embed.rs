//! Coordinates from connectivity.
//!
//! Target distances are derived from the bond graph, turned into initial
//! coordinates by classical multidimensional scaling (eigendecomposition of
//! the double-centred squared distance matrix) and refined by stress
//! majorization. 2D layouts are used for depictions; 3D embeddings feed the
//! QEq solver.

use nalgebra::{DMatrix, SymmetricEigen};

use super::error::Error;
use super::hydrogens::ExplicitGraph;
use crate::model::molecule::Molecule;

const REFINEMENT_SWEEPS: usize = 60;
const EIGEN_EPS: f64 = 1e-12;
const EIGEN_MAX_ITER: usize = 10_000;

/// Scale applied to path lengths spanning more than one bond (zig-zag chains
/// are shorter than the sum of their bond lengths).
const PATH_CONTRACTION: f64 = 0.82;

/// 2D depiction coordinates with unit bond length.
pub fn layout_2d(mol: &Molecule) -> Result<Vec<[f64; 2]>, Error> {
    let n = mol.atom_count();
    let mut edges = Vec::with_capacity(mol.bond_count());
    for bond in &mol.bonds {
        edges.push((bond.i, bond.j, 1.0));
    }
    let dist = graph_distances(n, &edges, 1.0);
    let coords = embed(&dist, 2)?;
    Ok(coords.into_iter().map(|p| [p[0], p[1]]).collect())
}

/// 3D coordinates (Å) for every node of an all-atom graph.
pub(crate) fn embed_3d(graph: &ExplicitGraph) -> Result<Vec<[f64; 3]>, Error> {
    let edges: Vec<(usize, usize, f64)> = graph
        .bonds
        .iter()
        .map(|&(i, j, _)| {
            let length = graph.elements[i].covalent_radius() + graph.elements[j].covalent_radius();
            (i, j, length)
        })
        .collect();
    let dist = graph_distances(graph.len(), &edges, PATH_CONTRACTION);
    let coords = embed(&dist, 3)?;
    Ok(coords.into_iter().map(|p| [p[0], p[1], p[2]]).collect())
}

/// Shortest-path distances; multi-bond paths are scaled by `contraction`.
///
/// Atoms in different components are placed a little beyond the largest
/// finite distance.
fn graph_distances(n: usize, edges: &[(usize, usize, f64)], contraction: f64) -> DMatrix<f64> {
    let mut length = DMatrix::from_element(n, n, f64::INFINITY);
    let mut hops = DMatrix::from_element(n, n, usize::MAX);
    for i in 0..n {
        length[(i, i)] = 0.0;
        hops[(i, i)] = 0;
    }
    for &(i, j, l) in edges {
        length[(i, j)] = l;
        length[(j, i)] = l;
        hops[(i, j)] = 1;
        hops[(j, i)] = 1;
    }

    for k in 0..n {
        for i in 0..n {
            if length[(i, k)].is_infinite() {
                continue;
            }
            for j in 0..n {
                let through = length[(i, k)] + length[(k, j)];
                if through < length[(i, j)] {
                    length[(i, j)] = through;
                    hops[(i, j)] = hops[(i, k)] + hops[(k, j)];
                }
            }
        }
    }

    let max_finite = length
        .iter()
        .copied()
        .filter(|d| d.is_finite())
        .fold(0.0_f64, f64::max);

    DMatrix::from_fn(n, n, |i, j| {
        let d = length[(i, j)];
        if d.is_infinite() {
            max_finite + 3.0
        } else if hops[(i, j)] > 1 {
            d * contraction
        } else {
            d
        }
    })
}

fn embed(dist: &DMatrix<f64>, dims: usize) -> Result<Vec<Vec<f64>>, Error> {
    let n = dist.nrows();
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![vec![0.0; dims]]);
    }

    let mut coords = classical_mds(dist, dims)?;
    perturb(&mut coords);
    refine(&mut coords, dist);

    if coords.iter().flatten().any(|x| !x.is_finite()) {
        return Err(Error::Embedding("non-finite coordinates".into()));
    }
    Ok(coords)
}

fn classical_mds(dist: &DMatrix<f64>, dims: usize) -> Result<Vec<Vec<f64>>, Error> {
    let n = dist.nrows();
    let sq = dist.map(|d| d * d);
    let row_means: Vec<f64> = (0..n).map(|i| sq.row(i).mean()).collect();
    let grand_mean = sq.mean();
    let gram = DMatrix::from_fn(n, n, |i, j| {
        -0.5 * (sq[(i, j)] - row_means[i] - row_means[j] + grand_mean)
    });

    let eigen = SymmetricEigen::try_new(gram, EIGEN_EPS, EIGEN_MAX_ITER)
        .ok_or_else(|| Error::Embedding("eigendecomposition did not converge".into()))?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let mut coords = vec![vec![0.0; dims]; n];
    for (axis, &k) in order.iter().take(dims).enumerate() {
        let lambda = eigen.eigenvalues[k];
        if lambda <= 0.0 {
            continue;
        }
        let scale = lambda.sqrt();
        for (i, point) in coords.iter_mut().enumerate() {
            point[axis] = eigen.eigenvectors[(i, k)] * scale;
        }
    }
    Ok(coords)
}

/// Deterministic small displacement so that symmetry-equivalent atoms
/// (e.g. the hydrogens of a methyl group) never coincide.
fn perturb(coords: &mut [Vec<f64>]) {
    for (i, point) in coords.iter_mut().enumerate() {
        for (axis, x) in point.iter_mut().enumerate() {
            let phase = (i as f64 + 1.0) * (axis as f64 + 1.0) * 2.399_963;
            *x += 0.05 * phase.sin();
        }
    }
}

/// Localized stress majorization with weights `d⁻²`.
fn refine(coords: &mut [Vec<f64>], dist: &DMatrix<f64>) {
    let n = coords.len();
    let dims = coords[0].len();

    for _ in 0..REFINEMENT_SWEEPS {
        for i in 0..n {
            let mut numerator = vec![0.0; dims];
            let mut weight_sum = 0.0;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let target = dist[(i, j)];
                if target <= 0.0 {
                    continue;
                }
                let w = 1.0 / (target * target);
                let current: f64 = (0..dims)
                    .map(|a| (coords[i][a] - coords[j][a]).powi(2))
                    .sum::<f64>()
                    .sqrt();
                for a in 0..dims {
                    let pull = if current > 1e-9 {
                        target * (coords[i][a] - coords[j][a]) / current
                    } else {
                        0.0
                    };
                    numerator[a] += w * (coords[j][a] + pull);
                }
                weight_sum += w;
            }
            if weight_sum > 0.0 {
                for a in 0..dims {
                    coords[i][a] = numerator[a] / weight_sum;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn distance(a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
    }

    #[test]
    fn bonded_atoms_sit_about_one_unit_apart() {
        let mol = parse_smiles("c1ccccc1O").unwrap();
        let coords = layout_2d(&mol).unwrap();
        for bond in &mol.bonds {
            let d = distance(&coords[bond.i], &coords[bond.j]);
            assert!((0.7..1.3).contains(&d), "bond {}-{} length {d}", bond.i, bond.j);
        }
    }

    #[test]
    fn three_dimensional_embedding_separates_all_atoms() {
        let mol = parse_smiles("CC(C)O").unwrap();
        let graph = ExplicitGraph::expand(&mol);
        let coords = embed_3d(&graph).unwrap();
        assert_eq!(coords.len(), graph.len());
        for i in 0..coords.len() {
            for j in (i + 1)..coords.len() {
                assert!(distance(&coords[i], &coords[j]) > 0.3);
            }
        }
    }

    #[test]
    fn trivial_molecules() {
        assert!(layout_2d(&Molecule::new()).unwrap().is_empty());
        let single = parse_smiles("C").unwrap();
        assert_eq!(layout_2d(&single).unwrap(), vec![[0.0, 0.0]]);
    }
}
