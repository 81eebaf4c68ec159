//! `.smi` files: one `SMILES title` record per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{Error, Format};
use crate::model::molecule::Molecule;
use crate::smiles::parse_smiles_line;

/// Reads every record; blank lines and `#` comments are skipped.
pub fn read<R: BufRead>(reader: R) -> Result<Vec<Molecule>, Error> {
    let mut molecules = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mol = parse_smiles_line(trimmed)
            .map_err(|e| Error::parse(Format::Smi, i + 1, e.to_string()))?;
        molecules.push(mol);
    }
    Ok(molecules)
}

pub fn read_file(path: &Path) -> Result<Vec<Molecule>, Error> {
    let file = File::open(path).map_err(|e| Error::file(path, e))?;
    read(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn reads_titles() {
        let text = "# benchmark\n[NH2:2][c:1]1ccccc1 phenyl_amino\n\nFc1ccccc1\tphenyl_fluoro\n";
        let mols = read(Cursor::new(text)).unwrap();
        assert_eq!(mols.len(), 2);
        assert_eq!(mols[0].title, "phenyl_amino");
        assert_eq!(mols[1].title, "phenyl_fluoro");
        assert_eq!(mols[0].atom_by_map(2).map(|i| mols[0].atoms[i].implicit_hydrogens), Some(2));
    }

    #[test]
    fn parse_error_reports_line() {
        let err = read(Cursor::new("CCO ethanol\nC1CC broken\n")).unwrap_err();
        assert!(matches!(err, Error::Parse { format: Format::Smi, line: 2, .. }));
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CC ethane").unwrap();
        let mols = read_file(file.path()).unwrap();
        assert_eq!(mols[0].atom_count(), 2);
        assert!(read_file(Path::new("/nonexistent/set.smi")).is_err());
    }
}
