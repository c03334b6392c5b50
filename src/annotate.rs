//! The annotation pipeline: newline stripping, cue computation, correction
//! passes, and freezing.
//!
//! Tokenization, lemmas, POS tags, and the dependency tree come from an
//! external tagger behind the [`Annotator`] trait. Everything downstream of
//! the tagger runs here: newlines are stripped before annotation (taggers
//! mangle them) and recovered as character offsets; a cue pass stamps every
//! token with its classification flags; correction passes repair the
//! tagger's habitual mistakes and re-split sentences along line breaks.

use std::collections::BTreeSet;

use tracing::debug;

use crate::document::{Document, DraftDocument};
use crate::error::PlayResult;
use crate::lexicon;
use crate::token::{static_cues, Pos};

/// Adapter over an external morphosyntactic tagger.
///
/// Implementations receive text with newlines already replaced by spaces
/// and must fill in every [`Token`](crate::Token) field except the cues.
pub trait Annotator {
    fn annotate(&self, text: &str) -> PlayResult<DraftDocument>;
}

/// A deterministic pass that edits the draft after the tagger ran.
pub trait Correction {
    fn name(&self) -> &'static str;
    fn apply(&self, draft: &mut DraftDocument);
}

/// Replace newlines with spaces, recording their character offsets.
///
/// The replacement is the same length as the original, so token offsets
/// reported by the tagger stay valid against the original text.
pub fn strip_newlines(text: &str) -> (String, BTreeSet<usize>) {
    let mut stripped = String::with_capacity(text.len());
    let mut offsets = BTreeSet::new();
    for (i, c) in text.chars().enumerate() {
        if c == '\n' {
            offsets.insert(i);
            stripped.push(' ');
        } else {
            stripped.push(c);
        }
    }
    (stripped, offsets)
}

/// Re-split sentences so that every line break opens a new sentence.
///
/// Stock sentence splitters merge a narration line with the replica that
/// follows it; dialogue layout makes the line break an authoritative
/// boundary.
pub struct NewlineSentencizer;

impl Correction for NewlineSentencizer {
    fn name(&self) -> &'static str {
        "newline_sentencizer"
    }

    fn apply(&self, draft: &mut DraftDocument) {
        let n = draft.tokens.len();
        if n == 0 {
            return;
        }
        draft.tokens[0].sent_start = true;
        let mut seen_period = draft.tokens[0].cues.is_sent_end;
        for i in 1..n {
            let after_break = draft.tokens[i - 1].cues.has_newline;
            let opens = after_break || (seen_period && !draft.tokens[i].cues.is_punct);
            if opens {
                draft.tokens[i].sent_start = true;
                seen_period = false;
            } else {
                draft.tokens[i].sent_start = false;
            }
            if draft.tokens[i].cues.is_sent_end {
                seen_period = true;
            }
        }
    }
}

/// Repair the tagger's recurring POS mistakes.
///
/// Two directions: known verb forms mistagged as something else are forced
/// back to verbhood, and title-cased "particles" that are not in the
/// particle inventory but hang off a verb are really proper names.
pub struct PosFixCorrection;

impl PosFixCorrection {
    fn has_linked_verb(draft: &DraftDocument, index: usize) -> bool {
        // Head chain first, bounded by the token count.
        let mut current = index;
        for _ in 0..draft.tokens.len() {
            let head = draft.tokens[current].head;
            if head == current {
                break;
            }
            if matches!(draft.tokens[head].pos, Pos::Verb | Pos::Aux) {
                return true;
            }
            current = head;
        }
        draft
            .tokens
            .iter()
            .enumerate()
            .any(|(i, t)| t.head == index && i != index && matches!(t.pos, Pos::Verb | Pos::Aux))
    }
}

impl Correction for PosFixCorrection {
    fn name(&self) -> &'static str {
        "pos_fix"
    }

    fn apply(&self, draft: &mut DraftDocument) {
        for i in 0..draft.tokens.len() {
            let norm = draft.tokens[i].text.trim().to_lowercase();

            if lexicon::MISPREDICTED_VERBS.contains(norm.as_str()) {
                draft.tokens[i].pos = Pos::Verb;
            }
            if draft.tokens[i].sent_start
                && lexicon::MISPREDICTED_VERBS_SENT_START.contains(norm.as_str())
            {
                draft.tokens[i].pos = Pos::Verb;
            }

            if draft.tokens[i].cues.is_title
                && draft.tokens[i].pos == Pos::Part
                && !lexicon::PARTICLES.contains(norm.as_str())
                && !lexicon::PARTICLE_ENDINGS.iter().any(|e| norm.ends_with(e))
                && Self::has_linked_verb(draft, i)
            {
                draft.tokens[i].pos = Pos::Propn;
            }
        }
    }
}

/// Ordered correction passes applied between the tagger and the freeze.
pub struct Pipeline {
    corrections: Vec<Box<dyn Correction>>,
}

impl Pipeline {
    /// The pass order calibrated for Russian prose: cue-aware sentence
    /// splitting first, POS repair second (it needs sentence starts).
    pub fn russian() -> Self {
        Self {
            corrections: vec![Box::new(NewlineSentencizer), Box::new(PosFixCorrection)],
        }
    }

    /// Append a correction pass after the built-in ones.
    pub fn register(&mut self, correction: Box<dyn Correction>) {
        self.corrections.push(correction);
    }

    /// Annotate raw text end to end: strip newlines, run the tagger, then
    /// finish the draft.
    pub fn annotate<A: Annotator>(&self, annotator: &A, text: &str) -> PlayResult<Document> {
        let (stripped, newline_offsets) = strip_newlines(text);
        let mut draft = annotator.annotate(&stripped)?;
        draft.newline_offsets = newline_offsets;
        Ok(self.finish(draft))
    }

    /// Stamp cues, run corrections, assign sentence indices, and freeze.
    pub fn finish(&self, mut draft: DraftDocument) -> Document {
        stamp_cues(&mut draft);
        for correction in &self.corrections {
            debug!(pass = correction.name(), "applying correction");
            correction.apply(&mut draft);
        }
        assign_sentence_indices(&mut draft);
        Document::freeze(draft)
    }
}

/// Compute every token's cue struct in one pass.
fn stamp_cues(draft: &mut DraftDocument) {
    let n = draft.tokens.len();
    let mut line_no: u32 = 1;
    for i in 0..n {
        let tok = &draft.tokens[i];
        let mut cues = static_cues(&tok.text, &tok.lemma);

        // A newline hides inside the trailing whitespace when one of the
        // recorded offsets falls into its character range.
        let ws_start = tok.offset + tok.text.chars().count();
        let ws_end = ws_start + tok.ws.chars().count();
        cues.has_newline = draft
            .newline_offsets
            .range(ws_start..ws_end)
            .next()
            .is_some();
        if i + 1 == n {
            cues.has_newline = true;
        }

        cues.line_no = line_no;
        if cues.has_newline {
            line_no += 1;
        }

        draft.tokens[i].cues = cues;
    }
}

fn assign_sentence_indices(draft: &mut DraftDocument) {
    let mut index = 0usize;
    for (i, tok) in draft.tokens.iter_mut().enumerate() {
        if tok.sent_start && i > 0 {
            index += 1;
        }
        tok.sent_index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{t, Fixture};
    use crate::token::Dep;

    #[test]
    fn strip_newlines_preserves_length_and_offsets() {
        let (stripped, offsets) = strip_newlines("ab\ncd\n");
        assert_eq!(stripped, "ab cd ");
        assert_eq!(offsets.into_iter().collect::<Vec<_>>(), vec![2, 5]);
    }

    #[test]
    fn newline_opens_a_sentence_without_punctuation() {
        let doc = Fixture::new(vec![
            t("ночь").pos(Pos::Noun).dep(Dep::Root).nl(),
            t("улица").pos(Pos::Noun).dep(Dep::Root),
        ])
        .build();
        assert!(doc.token(1).sent_start);
        assert_eq!(doc.token(1).sent_index, 1);
    }

    #[test]
    fn sentence_punctuation_breaks_before_next_word() {
        let doc = Fixture::new(vec![
            t("Стоп").pos(Pos::Intj).dep(Dep::Root),
            t("!").dep(Dep::Punct).head(0),
            t("Хватит").pos(Pos::Verb).dep(Dep::Root),
            t(".").dep(Dep::Punct).head(2),
        ])
        .build();
        assert!(doc.token(2).sent_start);
        assert!(!doc.token(1).sent_start);
    }

    #[test]
    fn line_numbers_advance_after_breaks() {
        let doc = Fixture::new(vec![
            t("один").pos(Pos::Num).dep(Dep::Root).nl(),
            t("два").pos(Pos::Num).dep(Dep::Root).nl(),
            t("три").pos(Pos::Num).dep(Dep::Root),
        ])
        .build();
        assert_eq!(doc.token(0).cues.line_no, 1);
        assert_eq!(doc.token(1).cues.line_no, 2);
        assert_eq!(doc.token(2).cues.line_no, 3);
    }

    #[test]
    fn mistagged_particle_becomes_proper_name() {
        let doc = Fixture::new(vec![
            t("Чтож").pos(Pos::Part).dep(Dep::Nsubj).head(1),
            t("сказал").pos(Pos::Verb).dep(Dep::Root),
        ])
        .build();
        assert_eq!(doc.token(0).pos, Pos::Propn);
    }
}
