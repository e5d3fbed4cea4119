//! Candidate content formats and their identifiers.

use serde::{Deserialize, Serialize};

/// Within-run identifier of a [`Format`].
///
/// Initial-batch ids follow the pattern `fmt-NNN` (zero-padded, 1-based).
/// Rework replacements append a letter to the rejected id (`fmt-003a`).
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[from(String, &str)]
pub struct FormatId(String);

impl FormatId {
    /// Builds the id for position `n` (1-based) of an initial batch.
    ///
    /// # Examples
    ///
    /// ```
    /// use vasari_core::FormatId;
    ///
    /// assert_eq!(FormatId::batch(3).as_str(), "fmt-003");
    /// ```
    pub fn batch(n: usize) -> Self {
        Self(format!("fmt-{:03}", n))
    }

    /// The two replacement ids derived from this id on rejection.
    ///
    /// # Examples
    ///
    /// ```
    /// use vasari_core::FormatId;
    ///
    /// let (a, b) = FormatId::from("fmt-003").rework_pair();
    /// assert_eq!(a.as_str(), "fmt-003a");
    /// assert_eq!(b.as_str(), "fmt-003b");
    /// ```
    pub fn rework_pair(&self) -> (Self, Self) {
        (Self(format!("{}a", self.0)), Self(format!("{}b", self.0)))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Caller-assigned disposition of a format in the working set.
///
/// `rejected` is not a resting state: rejection removes the record and
/// triggers replacement, so the working set only ever holds these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Awaiting caller review
    Pending,
    /// Approved for script generation
    Approved,
}

/// A candidate content concept awaiting approval or rejection.
///
/// Created only by the format-generation or rework stages; never mutated in
/// place. A reworked format is a brand-new record replacing its
/// predecessor's slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format {
    /// Within-run identifier
    pub id: FormatId,
    /// Short concept title
    pub title: String,
    /// What happens in the content
    pub description: String,
    /// What the concept is optimized for
    pub goal: String,
    /// Referenced trend labels
    pub trends: Vec<String>,
    /// Rework replacements explain themselves; empty for initial candidates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub why_this_works: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_ids_are_zero_padded() {
        assert_eq!(FormatId::batch(1).as_str(), "fmt-001");
        assert_eq!(FormatId::batch(6).as_str(), "fmt-006");
        assert_eq!(FormatId::batch(12).as_str(), "fmt-012");
    }

    #[test]
    fn rework_pair_appends_letters() {
        let (a, b) = FormatId::batch(4).rework_pair();
        assert_eq!(a.as_str(), "fmt-004a");
        assert_eq!(b.as_str(), "fmt-004b");
    }

    #[test]
    fn format_deserializes_without_why_this_works() {
        let json = r#"{"id":"fmt-001","title":"t","description":"d","goal":"g","trends":[]}"#;
        let format: Format = serde_json::from_str(json).unwrap();
        assert!(format.why_this_works.is_empty());
    }
}
