//! Tuning constants for the speaker-attribution cascade.
//!
//! Every empirically calibrated constant lives here as a named field so it
//! can be recalibrated per corpus without touching control flow.

use serde::{Deserialize, Serialize};

/// Configuration for replica extraction and speaker resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Maximum number of backward context windows inspected while resolving
    /// a referential pronoun. The cap guarantees termination of the
    /// reference search.
    pub reference_depth: usize,

    /// Number of distinct previously seen speakers required before the
    /// turn-taking alternation rule may fire.
    pub alternation_min_speakers: usize,

    /// Token radius used when deciding whether a replica visually fills its
    /// own physical line (newline on both sides, no author text).
    pub line_isolation_radius: usize,

    /// Minimum number of non-trivial (non-punctuation, non-layout) tokens a
    /// preceding narration sentence must contain to be searched by the
    /// visual-isolation fallback.
    pub min_author_sentence_len: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            reference_depth: 5,
            alternation_min_speakers: 2,
            line_isolation_radius: 3,
            min_author_sentence_len: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_calibration() {
        let config = ClassifierConfig::default();
        assert_eq!(config.reference_depth, 5);
        assert_eq!(config.alternation_min_speakers, 2);
        assert_eq!(config.line_isolation_radius, 3);
    }
}
