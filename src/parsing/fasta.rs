//! FASTA input for unknown-element and library files, using noodles.
//!
//! Supports both uncompressed and gzip/bgzip compressed files.

use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;

use crate::core::sequence::SequenceRecord;
use crate::parsing::report::ParseError;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub(crate) fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read every record of a FASTA file.
///
/// An empty file yields an empty vector: a previous round may have classified
/// everything.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// a record cannot be decoded, or `ParseError::DuplicateId` if two records share
/// the same id once their `#annotation` is removed.
pub fn read_sequences(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        let reader = BufReader::new(MultiGzDecoder::new(file));
        read_sequences_from(&mut fasta::io::Reader::new(reader))
    } else {
        read_sequences_from(&mut fasta::io::Reader::new(BufReader::new(file)))
    }
}

/// Read every record from a noodles FASTA reader
///
/// # Errors
///
/// See [`read_sequences`].
pub fn read_sequences_from<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut sequences = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let name = utf8_field(record.name(), "name")?;
        let description = record
            .description()
            .map(|d| utf8_field(d, "description"))
            .transpose()?;
        let sequence = SequenceRecord::new(&name, description, record.sequence().as_ref().to_vec());

        if sequence.id.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "FASTA record '{name}' has an empty id"
            )));
        }
        if !seen.insert(sequence.id.clone()) {
            return Err(ParseError::DuplicateId(sequence.id));
        }

        sequences.push(sequence);
    }

    Ok(sequences)
}

/// Header text is written back verbatim, so it must decode without loss
fn utf8_field(bytes: &[u8], field: &str) -> Result<String, ParseError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| {
        ParseError::InvalidFormat(format!(
            "FASTA {field} '{}' is not valid UTF-8",
            String::from_utf8_lossy(bytes)
        ))
    })
}
