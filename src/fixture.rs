//! Hand-annotated document construction for tests.
//!
//! Real input goes through an external tagger; tests instead declare the
//! annotation a tagger would produce, token by token, and run the same
//! finishing pipeline over it. [`plain`] covers the cases where only
//! punctuation and layout matter and no syntax is needed.

use std::collections::BTreeSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::annotate::{strip_newlines, Pipeline};
use crate::document::{Document, DraftDocument};
use crate::morph::Morph;
use crate::token::{Cues, Dep, Pos, Token};

/// Start a token spec. Lemma defaults to the lowercased text, part of
/// speech to `Punct` for punctuation-only text and `X` otherwise, and the
/// head to the token itself.
pub fn t(text: &str) -> TokenSpec {
    TokenSpec {
        text: text.to_string(),
        ws: None,
        lemma: None,
        pos: None,
        dep: Dep::Dep,
        head: None,
        morph: Morph::new(),
        ent: None,
        newline: false,
    }
}

#[derive(Debug, Clone)]
pub struct TokenSpec {
    text: String,
    ws: Option<String>,
    lemma: Option<String>,
    pos: Option<Pos>,
    dep: Dep,
    head: Option<usize>,
    morph: Morph,
    ent: Option<u32>,
    newline: bool,
}

impl TokenSpec {
    pub fn ws(mut self, ws: &str) -> Self {
        self.ws = Some(ws.to_string());
        self
    }

    pub fn lemma(mut self, lemma: &str) -> Self {
        self.lemma = Some(lemma.to_string());
        self
    }

    pub fn pos(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn dep(mut self, dep: Dep) -> Self {
        self.dep = dep;
        self
    }

    pub fn head(mut self, head: usize) -> Self {
        self.head = Some(head);
        self
    }

    pub fn morph(mut self, morph: Morph) -> Self {
        self.morph = morph;
        self
    }

    pub fn ent(mut self, id: u32) -> Self {
        self.ent = Some(id);
        self
    }

    /// Put a line break inside this token's trailing whitespace.
    pub fn nl(mut self) -> Self {
        self.newline = true;
        self
    }
}

/// A declared document awaiting finishing.
pub struct Fixture {
    specs: Vec<TokenSpec>,
}

impl Fixture {
    pub fn new(specs: Vec<TokenSpec>) -> Self {
        Self { specs }
    }

    /// Materialize the tokens, run the Russian finishing pipeline, and
    /// freeze.
    pub fn build(self) -> Document {
        let mut draft = DraftDocument::default();
        let mut newline_offsets = BTreeSet::new();
        let mut cursor = 0usize;

        for (i, spec) in self.specs.into_iter().enumerate() {
            let text = spec.text;
            let ws = spec.ws.unwrap_or_else(|| " ".to_string());
            let lemma = spec.lemma.unwrap_or_else(|| text.to_lowercase());
            let pos = spec.pos.unwrap_or_else(|| {
                if !text.is_empty() && text.chars().all(|c| !c.is_alphanumeric()) {
                    Pos::Punct
                } else {
                    Pos::X
                }
            });

            let offset = cursor;
            let text_chars = text.chars().count();
            if spec.newline {
                newline_offsets.insert(offset + text_chars);
            }
            cursor = offset + text_chars + ws.chars().count();

            draft.tokens.push(Token {
                text,
                ws,
                lemma,
                pos,
                dep: spec.dep,
                head: spec.head.unwrap_or(i),
                morph: spec.morph,
                offset,
                sent_index: 0,
                sent_start: i == 0,
                ent: spec.ent,
                cues: Cues::default(),
            });
        }

        draft.newline_offsets = newline_offsets;
        Pipeline::russian().finish(draft)
    }
}

/// Build a document from raw text using word-boundary segmentation alone.
///
/// Every word token comes out as `X` with no syntax, so this only suits
/// tests that exercise punctuation and layout handling.
pub fn plain(text: &str) -> Document {
    let (stripped, newline_offsets) = strip_newlines(text);
    let mut draft = DraftDocument {
        tokens: Vec::new(),
        newline_offsets,
    };

    let mut cursor = 0usize;
    for piece in stripped.split_word_bounds() {
        let chars = piece.chars().count();
        if piece.chars().all(char::is_whitespace) {
            if let Some(last) = draft.tokens.last_mut() {
                last.ws.push_str(piece);
            }
            cursor += chars;
            continue;
        }
        let pos = if piece.chars().all(|c| !c.is_alphanumeric()) {
            Pos::Punct
        } else {
            Pos::X
        };
        let index = draft.tokens.len();
        draft.tokens.push(Token {
            text: piece.to_string(),
            ws: String::new(),
            lemma: piece.to_lowercase(),
            pos,
            dep: Dep::Dep,
            head: index,
            morph: Morph::new(),
            offset: cursor,
            sent_index: 0,
            sent_start: index == 0,
            ent: None,
            cues: Cues::default(),
        });
        cursor += chars;
    }

    Pipeline::russian().finish(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_splits_words_and_attaches_whitespace() {
        let doc = plain("— Привет!\nПока.");
        let texts: Vec<&str> = doc.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["—", "Привет", "!", "Пока", "."]);
        assert!(doc.token(2).cues.has_newline);
        assert_eq!(doc.token(3).cues.line_no, 2);
    }

    #[test]
    fn fixture_offsets_line_up_with_newline_flags() {
        let doc = Fixture::new(vec![t("а").nl(), t("б")]).build();
        assert!(doc.token(0).cues.has_newline);
        assert!(doc.token(1).cues.has_newline);
        assert_eq!(doc.token(1).cues.line_no, 2);
    }
}
