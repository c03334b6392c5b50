//! Dialogue extraction and speaker attribution for unmarked narrative
//! prose.
//!
//! Narrative fiction rarely tags who is speaking. This crate segments a
//! dependency-annotated document into replicas (uninterrupted lines of
//! character speech) and attributes each one to a character through a
//! cascade of discourse heuristics: explicit "said X" constructions,
//! bounded pronoun-reference resolution, turn-taking alternation, and
//! layout cues.
//!
//! Linguistic annotation itself is external: implement [`Annotator`] over
//! your tagger of choice and the [`Pipeline`] handles newline recovery,
//! cue computation, and the correction passes the heuristics rely on.
//!
//! ```ignore
//! use prose_play::ConversationClassifier;
//!
//! let classifier = ConversationClassifier::russian();
//! let doc = classifier.annotate(&tagger, text)?;
//! let dialogue = classifier.dialogue(&doc);
//! let play = classifier.play(&dialogue);
//! for line in play.lines() {
//!     println!("{:?}", line);
//! }
//! ```

mod annotate;
mod classifier;
mod config;
mod dep_match;
mod document;
mod error;
mod extract;
pub mod fixture;
pub mod lexicon;
mod morph;
mod noun_chunk;
mod play;
mod resolve;
mod span;
mod speaker;
mod token;

pub use annotate::{
    strip_newlines, Annotator, Correction, NewlineSentencizer, Pipeline, PosFixCorrection,
};
pub use classifier::ConversationClassifier;
pub use config::ClassifierConfig;
pub use dep_match::{linked_predicate, speaking_subjects, subject_of_speaking_verb};
pub use document::{Document, DraftDocument};
pub use error::{PlayError, PlayResult};
pub use extract::{extract_replicas, BoundaryCue, Dialogue, Replica};
pub use morph::{Case, Feature, Gender, Morph, Number, Person, Tense, VerbForm, Voice};
pub use noun_chunk::{expand_to_noun_chunk, noun_chunks, noun_chunks_in, NounChunk};
pub use play::{LineRecord, Play};
pub use resolve::SpeakerResolver;
pub use span::Span;
pub use speaker::{Speaker, SpeakerRecord};
pub use token::{Cues, Dep, Pos, Token};
