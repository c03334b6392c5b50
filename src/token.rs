//! Annotated tokens and their precomputed classification cues.
//!
//! A [`Token`] is the immutable annotated unit produced by the external
//! annotation pipeline: surface text, trailing whitespace, lemma, coarse
//! part of speech, dependency label, head index (the root self-references,
//! so heads always form a tree inside one document), morphology, and entity
//! tag.
//!
//! [`Cues`] is the fixed struct of classification flags the rest of the
//! crate consults. It is populated once per document by a post-annotation
//! pass instead of being recomputed through a registry of dynamically
//! resolved predicates.

use serde::{Deserialize, Serialize};

use crate::lexicon;
use crate::morph::Morph;

/// Coarse part-of-speech tags (Universal Dependencies inventory subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pos {
    Noun,
    Propn,
    Pron,
    Adj,
    Verb,
    Aux,
    Adv,
    Det,
    Num,
    Adp,
    Part,
    Cconj,
    Sconj,
    Intj,
    Punct,
    X,
}

impl Pos {
    /// Nominal categories that may head a noun phrase.
    pub fn is_nominal(self) -> bool {
        matches!(self, Pos::Noun | Pos::Propn | Pos::Pron | Pos::Num)
    }
}

/// Dependency relation labels (Universal Dependencies subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dep {
    Root,
    Nsubj,
    NsubjPass,
    Obj,
    Iobj,
    Obl,
    Nmod,
    Amod,
    Appos,
    Flat,
    Nummod,
    Det,
    Acl,
    Advmod,
    Case,
    Cc,
    Conj,
    Cop,
    Parataxis,
    Punct,
    Dep,
}

/// Precomputed per-token classification flags.
///
/// Populated exactly once by [`crate::annotate`]'s cue pass; never mutated
/// afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cues {
    /// Token consists of punctuation characters only.
    pub is_punct: bool,
    /// Token consists of alphabetic characters only.
    pub is_alpha: bool,
    /// First character is uppercase.
    pub is_title: bool,
    /// Token is a dialogue dash.
    pub is_dash: bool,
    pub is_open_quote: bool,
    pub is_close_quote: bool,
    /// Token text contains sentence-final punctuation.
    pub is_sent_end: bool,
    /// A stripped newline lay inside this token's trailing whitespace
    /// (always true for the final token of a document).
    pub has_newline: bool,
    /// Lemma belongs to the closed class of utterance verbs.
    pub is_speaking_verb: bool,
    /// Lemma is a pronoun or generic descriptive noun that needs an
    /// antecedent to name a character.
    pub is_referential_pronoun: bool,
    /// Physical line number (1-based), derived from newline cues.
    pub line_no: u32,
}

/// One annotated token. Owned solely by its [`Document`](crate::Document).
#[derive(Debug, Clone)]
pub struct Token {
    /// Surface text.
    pub text: String,
    /// Trailing whitespace in the newline-stripped text.
    pub ws: String,
    pub lemma: String,
    pub pos: Pos,
    pub dep: Dep,
    /// Index of the syntactic head within the same document; the root
    /// references itself.
    pub head: usize,
    pub morph: Morph,
    /// Character offset of the token start in the newline-stripped text.
    pub offset: usize,
    /// Sentence index, assigned by the sentence splitter correction.
    pub sent_index: usize,
    /// Marks that this token opens a sentence.
    pub sent_start: bool,
    /// Named-entity tag; contiguous tokens sharing an id form one entity.
    pub ent: Option<u32>,
    pub cues: Cues,
}

impl Token {
    /// A token that carries neither words nor sentence punctuation weight:
    /// punctuation or a line break carrier.
    pub fn is_non_word(&self) -> bool {
        self.cues.is_punct || self.cues.has_newline
    }
}

/// Compute the static (text-only) part of the cue struct.
pub(crate) fn static_cues(text: &str, lemma: &str) -> Cues {
    let is_punct = !text.is_empty() && text.chars().all(|c| !c.is_alphanumeric());
    Cues {
        is_punct,
        is_alpha: !text.is_empty() && text.chars().all(char::is_alphabetic),
        is_title: text.chars().next().map_or(false, char::is_uppercase),
        is_dash: lexicon::is_dash(text),
        is_open_quote: lexicon::OPEN_QUOTES.contains(text),
        is_close_quote: lexicon::CLOSE_QUOTES.contains(text),
        is_sent_end: text.chars().any(lexicon::is_sentence_final),
        has_newline: false,
        is_speaking_verb: lexicon::is_speaking_verb(lemma),
        is_referential_pronoun: lexicon::REFERRAL_PRON.contains(lemma),
        line_no: 1,
    }
}
