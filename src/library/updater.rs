use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::outcome::ElementOutcome;
use crate::core::sequence::{base_id, SequenceRecord};
use crate::parsing::fasta::{is_gzipped, read_sequences};
use crate::parsing::report::ParseError;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Output {} would overwrite input {}", output.display(), input.display())]
    Overwrite { output: PathBuf, input: PathBuf },
}

/// Inputs and outputs of one library update
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    /// FASTA of the round's unknown elements
    pub unknown_input: PathBuf,
    /// Known library the classified elements are appended to (read only)
    pub append_target: PathBuf,
    /// Append target plus newly classified elements
    pub known_output: PathBuf,
    /// Elements left unclassified
    pub unknown_output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub input: usize,
    pub classified: usize,
    pub still_unknown: usize,
    pub known_output: PathBuf,
    pub unknown_output: PathBuf,
}

/// Split of the unknown input into newly classified records (with their
/// labels) and records that stay unknown. Input order is kept on both sides.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub classified: Vec<(&'a SequenceRecord, &'a str)>,
    pub still_unknown: Vec<&'a SequenceRecord>,
}

/// Assign every sequence to exactly one side of the partition.
///
/// Only subfamily and family outcomes classify a sequence. Chimeric
/// elements and elements without an outcome stay unknown.
#[must_use]
pub fn partition<'a>(
    sequences: &'a [SequenceRecord],
    outcomes: &'a [ElementOutcome],
) -> Partition<'a> {
    let labels: HashMap<&str, &str> = outcomes
        .iter()
        .filter(|o| o.is_classified())
        .map(|o| (base_id(&o.query_id), o.label.as_str()))
        .collect();

    let mut result = Partition::default();
    for sequence in sequences {
        match labels.get(sequence.id.as_str()) {
            Some(&label) => result.classified.push((sequence, label)),
            None => result.still_unknown.push(sequence),
        }
    }
    result
}

/// Write the round's known and unknown FASTA outputs.
///
/// The known output starts as a copy of the append target (decompressed if
/// gzipped) and gains one `id#Label` record per newly classified element. The
/// unknown output receives every other input record unchanged.
///
/// # Errors
///
/// Returns `LibraryError::Overwrite` if an output path names an input file,
/// `LibraryError::Parse` if the unknown input cannot be read, or
/// `LibraryError::Io` if any file operation fails.
pub fn update_library(
    outcomes: &[ElementOutcome],
    paths: &LibraryPaths,
) -> Result<UpdateSummary, LibraryError> {
    for output in [&paths.known_output, &paths.unknown_output] {
        for input in [&paths.unknown_input, &paths.append_target] {
            if same_file(output, input) {
                return Err(LibraryError::Overwrite {
                    output: output.clone(),
                    input: input.clone(),
                });
            }
        }
    }

    let sequences = read_sequences(&paths.unknown_input)?;
    let split = partition(&sequences, outcomes);

    copy_library(&paths.append_target, &paths.known_output)?;
    {
        let file = OpenOptions::new().append(true).open(&paths.known_output)?;
        let mut buf = BufWriter::new(file);
        {
            let mut writer = fasta::io::Writer::new(&mut buf);
            for (sequence, label) in &split.classified {
                writer.write_record(&sequence.relabeled(label).to_fasta()?)?;
            }
        }
        buf.flush()?;
    }

    {
        let mut buf = BufWriter::new(File::create(&paths.unknown_output)?);
        {
            let mut writer = fasta::io::Writer::new(&mut buf);
            for sequence in &split.still_unknown {
                writer.write_record(&sequence.to_fasta()?)?;
            }
        }
        buf.flush()?;
    }

    let summary = UpdateSummary {
        input: sequences.len(),
        classified: split.classified.len(),
        still_unknown: split.still_unknown.len(),
        known_output: paths.known_output.clone(),
        unknown_output: paths.unknown_output.clone(),
    };

    info!(
        "Library update: {} of {} elements classified, {} still unknown",
        summary.classified, summary.input, summary.still_unknown
    );
    Ok(summary)
}

/// Copy `source` to `destination` as plain text, ending in a newline so that
/// appended records start on their own line
fn copy_library(source: &Path, destination: &Path) -> std::io::Result<()> {
    let mut input: Box<dyn Read> = if is_gzipped(source) {
        Box::new(MultiGzDecoder::new(File::open(source)?))
    } else {
        Box::new(File::open(source)?)
    };

    let mut output = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(destination)?;
    let copied = std::io::copy(&mut input, &mut output)?;

    if copied > 0 {
        let mut last = [0u8; 1];
        output.seek(SeekFrom::End(-1))?;
        output.read_exact(&mut last)?;
        if last[0] != b'\n' {
            output.seek(SeekFrom::End(0))?;
            output.write_all(b"\n")?;
        }
    }

    debug!(
        "Copied {} bytes of {} into {}",
        copied,
        source.display(),
        destination.display()
    );
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
