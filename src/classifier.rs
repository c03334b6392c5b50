//! The front door: one dispatch over a language pack, then extraction
//! and resolution without further language branching.

use crate::annotate::{Annotator, Correction, Pipeline};
use crate::config::ClassifierConfig;
use crate::document::Document;
use crate::error::PlayResult;
use crate::extract::Dialogue;
use crate::play::Play;
use crate::resolve::SpeakerResolver;

/// Combines a language pack (annotation corrections and the noun-chunk
/// strategy) with replica extraction and speaker resolution.
pub struct ConversationClassifier {
    pipeline: Pipeline,
    config: ClassifierConfig,
}

impl ConversationClassifier {
    /// The Russian language pack with default calibration.
    pub fn russian() -> Self {
        Self {
            pipeline: Pipeline::russian(),
            config: ClassifierConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a correction pass after the language pack's own.
    pub fn register_correction(&mut self, correction: Box<dyn Correction>) {
        self.pipeline.register(correction);
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Annotate raw text through an external tagger and this pack's
    /// correction pipeline.
    pub fn annotate<A: Annotator>(&self, annotator: &A, text: &str) -> PlayResult<Document> {
        self.pipeline.annotate(annotator, text)
    }

    /// Extract the ordered replicas of a document.
    pub fn dialogue<'d>(&self, doc: &'d Document) -> Dialogue<'d> {
        Dialogue::extract(doc)
    }

    /// Attribute every replica of a dialogue to a speaker.
    pub fn play<'d>(&self, dialogue: &Dialogue<'d>) -> Play<'d> {
        SpeakerResolver::new(dialogue.doc(), self.config.clone()).resolve(dialogue)
    }
}

impl Default for ConversationClassifier {
    fn default() -> Self {
        Self::russian()
    }
}
