use noodles::fasta;

use crate::parsing::report::ParseError;

/// Strip a `#annotation` suffix from a sequence name.
///
/// ```
/// use rep_classifier::core::sequence::base_id;
///
/// assert_eq!(base_id("rnd-1_family-12#Unknown"), "rnd-1_family-12");
/// assert_eq!(base_id("rnd-1_family-12"), "rnd-1_family-12");
/// ```
#[must_use]
pub fn base_id(name: &str) -> &str {
    name.split_once('#').map_or(name, |(id, _)| id)
}

/// A FASTA entry of the unknown or known library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Name without the `#annotation` suffix
    pub id: String,

    /// Text after `#` in the name, if any
    pub annotation: Option<String>,

    /// Free text after the name on the header line
    pub description: Option<String>,

    pub sequence: Vec<u8>,
}

impl SequenceRecord {
    /// Build a record from a full FASTA name such as `elem1#Unknown`
    pub fn new(name: &str, description: Option<String>, sequence: Vec<u8>) -> Self {
        let (id, annotation) = match name.split_once('#') {
            Some((id, annotation)) => (id.to_string(), Some(annotation.to_string())),
            None => (name.to_string(), None),
        };

        Self {
            id,
            annotation,
            description,
            sequence,
        }
    }

    /// Full name as it appears on the header line
    #[must_use]
    pub fn name(&self) -> String {
        match &self.annotation {
            Some(annotation) => format!("{}#{annotation}", self.id),
            None => self.id.clone(),
        }
    }

    /// Copy of this record with its annotation replaced by `label`
    #[must_use]
    pub fn relabeled(&self, label: &str) -> Self {
        Self {
            annotation: Some(label.to_string()),
            ..self.clone()
        }
    }

    /// Convert into a noodles record for writing
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Noodles` if the header cannot be represented as a
    /// FASTA definition (e.g. an empty name).
    pub fn to_fasta(&self) -> Result<fasta::Record, ParseError> {
        let header = match &self.description {
            Some(description) => format!(">{} {description}", self.name()),
            None => format!(">{}", self.name()),
        };

        let definition: fasta::record::Definition = header.parse().map_err(|e| {
            ParseError::Noodles(format!("Invalid FASTA header '{header}': {e}"))
        })?;

        Ok(fasta::Record::new(
            definition,
            fasta::record::Sequence::from(self.sequence.clone()),
        ))
    }
}
