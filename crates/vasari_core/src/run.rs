//! Opaque pipeline-run identifiers.

use serde::{Deserialize, Serialize};

/// Opaque identifier of one pipeline run.
///
/// Generated at brief-submission time; a new brief always starts a new run.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[from(String, &str)]
pub struct RunId(String);

impl RunId {
    /// Generates a fresh random run identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(RunId::generate(), RunId::generate());
    }
}
