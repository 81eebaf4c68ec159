//! Partial charges and Wiberg bond orders.
//!
//! [`annotate`] is the entry point used by both pipelines: it assigns
//! partial charges with the configured [`ChargeMethod`] and then annotates
//! every bond with its Wiberg bond order. The models are deterministic
//! approximations computed from connectivity alone.

mod config;
mod embed;
mod error;
mod gasteiger;
mod hydrogens;
mod qeq;
mod wbo;

pub use config::{ChargeMethod, ParseChargeMethodError, QeqConfig, SolverOptions};
pub use embed::layout_2d;
pub use error::Error;
pub use gasteiger::gasteiger_charges;
pub use qeq::qeq_charges;
pub use wbo::wiberg_bond_orders;

use crate::model::molecule::Molecule;

/// Assigns partial charges in place according to `method`.
///
/// # Errors
///
/// Returns [`Error::EmptyMolecule`] for a molecule without atoms and
/// propagates QEq solver failures.
pub fn assign_charges(mol: &mut Molecule, method: &ChargeMethod) -> Result<(), Error> {
    if mol.atom_count() == 0 {
        return Err(Error::EmptyMolecule);
    }

    let charges = match method {
        ChargeMethod::None => vec![0.0; mol.atom_count()],
        ChargeMethod::Gasteiger => gasteiger_charges(mol),
        ChargeMethod::Qeq(config) => qeq_charges(mol, config)?,
    };

    for (atom, charge) in mol.atoms.iter_mut().zip(charges) {
        atom.partial_charge = charge;
    }
    Ok(())
}

/// Annotates every bond with its Wiberg bond order, using the partial
/// charges already on the atoms.
pub fn assign_bond_orders(mol: &mut Molecule) -> Result<(), Error> {
    let orders = wiberg_bond_orders(mol)?;
    for (bond, wbo) in mol.bonds.iter_mut().zip(orders) {
        bond.wbo = Some(wbo);
    }
    Ok(())
}

/// Returns a copy of `mol` with partial charges and Wiberg bond orders.
pub fn annotate(mol: &Molecule, method: &ChargeMethod) -> Result<Molecule, Error> {
    let mut charged = mol.clone();
    assign_charges(&mut charged, method)?;
    assign_bond_orders(&mut charged)?;
    Ok(charged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn annotate_sets_charges_and_every_bond_order() {
        let mol = parse_smiles("CC(=O)Nc1ccccc1").unwrap();
        let annotated = annotate(&mol, &ChargeMethod::Gasteiger).unwrap();
        assert_eq!(annotated.annotated_bond_count(), mol.bond_count());
        assert!(annotated.atoms.iter().any(|a| a.partial_charge != 0.0));
        assert!(mol.bonds.iter().all(|b| b.wbo.is_none()));
    }

    #[test]
    fn no_charges_leaves_zero() {
        let mol = parse_smiles("CCO").unwrap();
        let annotated = annotate(&mol, &ChargeMethod::None).unwrap();
        assert!(annotated.atoms.iter().all(|a| a.partial_charge == 0.0));
        assert!(annotated.bonds.iter().all(|b| b.wbo == Some(1.0)));
    }

    #[test]
    fn empty_molecule_is_rejected() {
        let err = annotate(&Molecule::new(), &ChargeMethod::Gasteiger).unwrap_err();
        assert!(matches!(err, Error::EmptyMolecule));
    }
}
