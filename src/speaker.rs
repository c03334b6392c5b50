//! Speaker candidates.

use std::fmt;

use serde::Serialize;

use crate::document::Document;
use crate::morph::{Gender, Morph};
use crate::noun_chunk::NounChunk;
use crate::span::Span;

/// A noun phrase naming a candidate character. An unresolvable speaker is
/// represented as `Option::None` at the [`Play`](crate::Play) level, not
/// by a variant here.
#[derive(Debug, Clone, Copy)]
pub struct Speaker<'d> {
    span: Span<'d>,
    /// The nominal head token inside the span.
    root: usize,
}

impl<'d> Speaker<'d> {
    pub fn new(span: Span<'d>, root: usize) -> Self {
        debug_assert!(span.contains(root));
        Self { span, root }
    }

    pub fn from_chunk(chunk: NounChunk<'d>) -> Self {
        Self::new(chunk.span, chunk.root)
    }

    /// A bare token standing in for a speaker when no chunk expansion
    /// succeeded.
    pub fn from_token(doc: &'d Document, index: usize) -> Self {
        Self::new(Span::new(doc, index, index + 1), index)
    }

    pub fn span(&self) -> Span<'d> {
        self.span
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn text(&self) -> String {
        self.span.text()
    }

    /// Space-joined lemmas of the span; the identity used for speaker
    /// deduplication and alternation tracking.
    pub fn lemma(&self) -> String {
        self.span
            .tokens()
            .iter()
            .filter(|t| !t.cues.is_punct)
            .map(|t| t.lemma.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn gender(&self) -> Option<Gender> {
        self.span.doc().token(self.root).morph.gender
    }

    pub fn morph(&self) -> &'d Morph {
        &self.span.doc().token(self.root).morph
    }

    /// Whether the speaker is itself only a reference (он, голос, ...)
    /// rather than a name.
    pub fn is_referential(&self) -> bool {
        self.span.doc().token(self.root).cues.is_referential_pronoun
    }

    /// Owned, serializable view of this speaker.
    pub fn record(&self) -> SpeakerRecord {
        SpeakerRecord {
            text: self.text(),
            lemma: self.lemma(),
        }
    }
}

impl PartialEq for Speaker<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.lemma() == other.lemma()
    }
}

impl Eq for Speaker<'_> {}

impl fmt::Display for Speaker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Owned speaker data for serialization and transcripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerRecord {
    pub text: String,
    pub lemma: String,
}
