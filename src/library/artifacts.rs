//! Tab-separated classification tables written alongside each round's FASTA
//! outputs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::outcome::ElementOutcome;
use crate::core::types::OutcomeKind;
use crate::matching::classifier::Classification;

pub const SUBFAMILY_FILE: &str = "subfamily_unambiguous_classified_elements.txt";
pub const FAMILY_FILE: &str = "family_unambiguous_classified_elements.txt";
pub const COMBINED_FILE: &str = "combined_classified_elements.txt";
pub const CHIMERIC_FILE: &str = "chimeric_elements.txt";

/// Where a round's classification tables were written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub subfamily: PathBuf,
    pub family: PathBuf,
    pub combined: PathBuf,
    pub chimeric: PathBuf,
}

impl ArtifactPaths {
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            subfamily: dir.join(SUBFAMILY_FILE),
            family: dir.join(FAMILY_FILE),
            combined: dir.join(COMBINED_FILE),
            chimeric: dir.join(CHIMERIC_FILE),
        }
    }
}

/// Write the four classification tables into `dir`.
///
/// The combined table lists subfamily rows first, then family rows.
///
/// # Errors
///
/// Returns an I/O error if any table cannot be written.
pub fn write_artifacts(
    dir: &Path,
    classification: &Classification,
) -> std::io::Result<ArtifactPaths> {
    let paths = ArtifactPaths::in_dir(dir);

    let subfamily: Vec<&ElementOutcome> =
        classification.of_kind(OutcomeKind::SubfamilyMatch).collect();
    let family: Vec<&ElementOutcome> = classification.of_kind(OutcomeKind::FamilyMatch).collect();
    let chimeric: Vec<&ElementOutcome> = classification.of_kind(OutcomeKind::Chimeric).collect();

    write_table(&paths.subfamily, &subfamily, |o| o.label.as_str())?;
    write_table(&paths.family, &family, |o| o.label.as_str())?;
    write_table(
        &paths.combined,
        &[subfamily.as_slice(), family.as_slice()].concat(),
        |o| o.label.as_str(),
    )?;
    write_table(&paths.chimeric, &chimeric, |o| o.evidence.as_str())?;

    Ok(paths)
}

fn write_table<F>(path: &Path, outcomes: &[&ElementOutcome], value: F) -> std::io::Result<()>
where
    F: Fn(&ElementOutcome) -> &str,
{
    let mut writer = BufWriter::new(File::create(path)?);
    for outcome in outcomes {
        writeln!(writer, "{}\t{}", outcome.query_id, value(*outcome))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::MatchRecord;

    #[test]
    fn test_write_artifacts() {
        let records = vec![
            MatchRecord::new("elemA", "LINE/L1", 500.0),
            MatchRecord::new("elemB", "LINE/L1", 500.0),
            MatchRecord::new("elemB", "LINE/L2", 480.0),
            MatchRecord::new("elemC", "LINE/L1", 500.0),
            MatchRecord::new("elemC", "DNA/hAT", 490.0),
            MatchRecord::new("elemE", "DNA/hAT", 10.0),
        ];
        let classification = Classification::from_records(&records);

        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), &classification).unwrap();

        let read = |p: &Path| std::fs::read_to_string(p).unwrap();
        assert_eq!(read(&paths.subfamily), "elemA\tLINE/L1\nelemE\tDNA/hAT\n");
        assert_eq!(read(&paths.family), "elemB\tLINE\n");
        assert_eq!(
            read(&paths.combined),
            "elemA\tLINE/L1\nelemE\tDNA/hAT\nelemB\tLINE\n"
        );
        assert_eq!(read(&paths.chimeric), "elemC\tLINE/L1,DNA/hAT\n");
    }

    #[test]
    fn test_empty_classification_writes_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), &Classification::default()).unwrap();
        for path in [&paths.subfamily, &paths.family, &paths.combined, &paths.chimeric] {
            assert!(path.exists());
            assert!(std::fs::read_to_string(path).unwrap().is_empty());
        }
    }
}
