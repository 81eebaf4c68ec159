//! The functional groups of the phenyl benchmark set.

/// A substituent studied in the benchmark, named by the token that tags
/// its molecules' titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substituent {
    pub name: &'static str,
}

const fn group(name: &'static str) -> Substituent {
    Substituent { name }
}

/// Every substituent, in plotting order.
pub static SUBSTITUENTS: [Substituent; 26] = [
    group("phenoxide"),
    group("dimethylamino"),
    group("methylamino"),
    group("amino"),
    group("ethylamino"),
    group("propylamino"),
    group("hydroxy"),
    group("methoxy"),
    group("ethoxy"),
    group("dimethylurea"),
    group("urea"),
    group("phenylurea"),
    group("ethylamide"),
    group("amide"),
    group("fluoro"),
    group("chloro"),
    group("methyl"),
    group("cyano"),
    group("bromo"),
    group("carbamate"),
    group("iodo"),
    group("benzoicacid"),
    group("ethoxycarbonyl"),
    group("trifluoromethyl"),
    group("trimethylamonium"),
    group("nitro"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn names_are_unique() {
        let names: BTreeSet<&str> = SUBSTITUENTS.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), SUBSTITUENTS.len());
    }

    #[test]
    fn plotting_order_is_fixed() {
        assert_eq!(SUBSTITUENTS[0].name, "phenoxide");
        assert_eq!(SUBSTITUENTS[3].name, "amino");
        assert_eq!(SUBSTITUENTS[25].name, "nitro");
    }
}
