use std::io::{self, Write};

use anyhow::Error;

use fragbench::{ChemError, FragmentError, IoError, PhenylError, ScoreError, SmilesError};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
}

impl HintCollector {
    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self { hints: Vec::new() };

        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<IoError>() {
                collector.io_hints(e);
            } else if let Some(e) = cause.downcast_ref::<ScoreError>() {
                collector.score_hints(e);
            } else if let Some(e) = cause.downcast_ref::<FragmentError>() {
                collector.fragment_hints(e);
            } else if let Some(e) = cause.downcast_ref::<PhenylError>() {
                collector.phenyl_hints(e);
            } else if let Some(e) = cause.downcast_ref::<ChemError>() {
                collector.chem_hints(e);
            } else if let Some(e) = cause.downcast_ref::<SmilesError>() {
                collector.smiles_hints(e);
            }
            if !collector.hints.is_empty() {
                break;
            }
        }

        if collector.hints.is_empty() {
            collector.fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn io_hints(&mut self, err: &IoError) {
        match err {
            IoError::Io { source } | IoError::File { source, .. } => {
                self.std_io_hints(source);
            }

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "Parser encountered an issue near line {} in {} format",
                    line, format
                ));
                self.add("Each .smi line must be `SMILES title`; blank and # lines are skipped");
            }

            IoError::Json { .. } => {
                self.add("The file is not valid JSON or does not match the expected layout");
                self.add("Score tables map \"(a, b)\" bond keys to {frags, mmd_scores}");
                self.add("Selected bond files hold {bonds, parent_smiles}");
            }

            IoError::Convert { format, .. } => {
                self.add(format!("The figure was drawn but could not be converted to {}", format));
                self.add("The .svg copy is written next to it only when conversion succeeds");
            }

            IoError::InvalidInput { .. } => {
                self.add("The file parsed as JSON but its content is unusable");
                self.add("Check that parent_smiles carries atom-map indices");
            }
        }
    }

    fn std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("A case needs <name>_selected_bonds.json, <name>_frag_with_scores.json and rescore/<name>_frag_with_scores.json under selected/<name>/");
                self.add("Use --root to point at the directory containing selected/");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn score_hints(&mut self, err: &ScoreError) {
        match err {
            ScoreError::MisalignedEntry { key, .. } => {
                self.add(format!(
                    "Entry '{}' must list exactly one MMD score per fragment",
                    key
                ));
            }

            ScoreError::InvalidKey { .. } => {
                self.add("Score table keys are atom-map pairs such as \"(3, 4)\"");
            }

            ScoreError::DuplicateBond { .. } => {
                self.add("Both orientations of one bond appear as separate keys");
                self.add("Merge them into a single entry");
            }

            ScoreError::RescoreMiss { key, .. } => {
                self.add(format!(
                    "The rescore table lists bond {} but not the fragment generated for it",
                    key
                ));
                self.add("Regenerate rescore/<name>_frag_with_scores.json with the same fragmenter options");
            }

            ScoreError::Fragment(inner) => self.fragment_hints(inner),
        }
    }

    fn fragment_hints(&mut self, err: &FragmentError) {
        match err {
            FragmentError::UnknownBond(bond) => {
                self.add(format!(
                    "Bond {} does not connect two atoms of parent_smiles",
                    bond
                ));
                self.add("Score table keys refer to atom-map indices, not atom positions");
            }

            FragmentError::UnmappedParent => {
                self.add("parent_smiles needs atom-map indices such as [CH3:1]");
            }

            FragmentError::GroupFile { .. } => {
                self.add("The -f value is neither False, None nor a readable file");
                self.add("Use -f None for the built-in functional groups");
            }

            FragmentError::GroupParse(_) => {
                self.add("Functional group files need a [groups] table of name = \"SMILES\"");
            }

            FragmentError::GroupPattern { name, .. } => {
                self.add(format!("Fix the SMILES pattern of group '{}'", name));
            }

            FragmentError::Chemistry(inner) => self.chem_hints(inner),
        }
    }

    fn phenyl_hints(&mut self, err: &PhenylError) {
        match err {
            PhenylError::Chemistry(inner) => self.chem_hints(inner),
            PhenylError::Render { figure, .. } => {
                self.add(format!("Drawing {} failed", figure));
                self.add("Check that --output-dir is writable");
            }
        }
    }

    fn chem_hints(&mut self, err: &ChemError) {
        match err {
            ChemError::EmptyMolecule => {
                self.add("An input SMILES produced no atoms");
            }

            ChemError::ChargeCalculation(_) | ChemError::Embedding(_) => {
                self.add("QEq charge calculation failed");
                self.add("Try --charge gasteiger or --charge none");
                self.add("Or raise --qeq-max-iter / loosen --qeq-tolerance");
            }

            ChemError::BondOrder { .. } => {
                self.add("The π system could not be solved");
                self.add("Check for unusual charges or valences in the input SMILES");
            }
        }
    }

    fn smiles_hints(&mut self, err: &SmilesError) {
        self.add(format!("Invalid SMILES: {}", err));
        self.add("Only the organic subset and bracket atoms are supported");
    }

    fn fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}
