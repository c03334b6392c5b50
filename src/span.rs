//! Contiguous token spans over a frozen [`Document`].
//!
//! A span is a cheap half-open index pair plus a borrow of its document.
//! Equality and hashing go by reconstructed surface text (trimmed), so a
//! speaker mentioned twice under the same name compares equal no matter
//! where the mention sits.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::document::Document;
use crate::token::Token;

#[derive(Clone, Copy)]
pub struct Span<'d> {
    doc: &'d Document,
    start: usize,
    end: usize,
}

impl<'d> Span<'d> {
    pub(crate) fn new(doc: &'d Document, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= doc.len());
        Self { doc, start, end }
    }

    pub fn doc(&self) -> &'d Document {
        self.doc
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn tokens(&self) -> &'d [Token] {
        &self.doc.tokens()[self.start..self.end]
    }

    pub fn first(&self) -> Option<&'d Token> {
        self.tokens().first()
    }

    pub fn last(&self) -> Option<&'d Token> {
        self.tokens().last()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Reconstructed surface text with outer whitespace trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for tok in self.tokens() {
            out.push_str(&tok.text);
            out.push_str(&tok.ws);
        }
        out.trim().to_string()
    }

    /// Physical line number of the span's first token.
    pub fn line_no(&self) -> u32 {
        self.first().map_or(1, |t| t.cues.line_no)
    }

    /// Physical line number of the span's last token.
    pub fn end_line_no(&self) -> u32 {
        self.last().map_or(1, |t| t.cues.line_no)
    }

    /// Number of tokens that are neither punctuation nor bare line breaks.
    pub fn word_len(&self) -> usize {
        self.tokens().iter().filter(|t| !t.is_non_word()).count()
    }

    /// Shrink both ends past punctuation and layout tokens.
    pub fn trim_non_word(&self) -> Span<'d> {
        let mut start = self.start;
        let mut end = self.end;
        while start < end && self.doc.token(start).cues.is_punct {
            start += 1;
        }
        while end > start && self.doc.token(end - 1).cues.is_punct {
            end -= 1;
        }
        Span::new(self.doc, start, end)
    }

    /// Extend the start leftwards to the beginning of its physical line.
    pub fn expand_to_prev_line(&self) -> Span<'d> {
        let mut start = self.start;
        while start > 0 && !self.doc.token(start - 1).cues.has_newline {
            start -= 1;
        }
        Span::new(self.doc, start, self.end)
    }

    /// Extend the end rightwards to the end of its physical line.
    pub fn expand_to_next_line(&self) -> Span<'d> {
        let mut end = self.end.max(self.start + 1).min(self.doc.len());
        while end < self.doc.len() && !self.doc.token(end - 1).cues.has_newline {
            end += 1;
        }
        Span::new(self.doc, self.start, end)
    }

    /// Whether the span occupies a physical line of its own: a line break
    /// within `radius` tokens on each side and no colon introducing it.
    /// The document edges count as line boundaries.
    pub fn fills_line(&self, radius: usize) -> bool {
        let doc = self.doc;
        let before = &doc.tokens()[self.start.saturating_sub(radius)..self.start];
        let starts_line =
            self.start == 0 || before.iter().any(|t| t.cues.has_newline);
        let introduced = before.iter().any(|t| t.text == ":");
        if !starts_line || introduced {
            return false;
        }
        if self.end == 0 {
            return false;
        }
        let after_from = self.end - 1;
        let after_to = (after_from + radius).min(doc.len());
        doc.tokens()[after_from..after_to]
            .iter()
            .any(|t| t.cues.has_newline)
    }

    /// Whether round parentheses enclose the span within `radius` tokens
    /// of each boundary, the shape of a stage direction.
    pub fn is_parenthesized(&self, radius: usize) -> bool {
        let doc = self.doc;
        let left_from = self.start.saturating_sub(1);
        let left_to = (self.start + radius).min(doc.len());
        let right_from = self.end.saturating_sub(radius);
        let right_to = (self.end + 1).min(doc.len());
        let opened = doc.tokens()[left_from..left_to]
            .iter()
            .any(|t| t.text == "(");
        let closed = doc.tokens()[right_from.max(left_from)..right_to]
            .iter()
            .any(|t| t.text == ")");
        opened && closed
    }
}

impl PartialEq for Span<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
    }
}

impl Eq for Span<'_> {}

impl Hash for Span<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text().hash(state);
    }
}

impl fmt::Debug for Span<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{} {:?})", self.start, self.end, self.text())
    }
}

impl fmt::Display for Span<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{t, Fixture};
    use crate::token::{Dep, Pos};

    fn doc() -> Document {
        Fixture::new(vec![
            t("Иван").pos(Pos::Propn).dep(Dep::Nsubj).head(1).nl(),
            t("—").dep(Dep::Punct).head(3),
            t("Привет").pos(Pos::Intj).dep(Dep::Root),
            t("!").dep(Dep::Punct).head(3).nl(),
            t("Конец").pos(Pos::Noun).dep(Dep::Root),
            t(".").dep(Dep::Punct).head(4),
        ])
        .build()
    }

    #[test]
    fn text_reconstruction_trims_trailing_whitespace() {
        let doc = doc();
        let span = Span::new(&doc, 2, 4);
        assert_eq!(span.text(), "Привет !");
    }

    #[test]
    fn equality_is_by_surface_text() {
        let doc = doc();
        assert_eq!(Span::new(&doc, 0, 1), Span::new(&doc, 0, 1));
        assert_ne!(Span::new(&doc, 0, 1), Span::new(&doc, 4, 5));
    }

    #[test]
    fn fills_line_requires_breaks_on_both_sides() {
        let doc = doc();
        // "— Привет !" sits alone on the middle line.
        assert!(Span::new(&doc, 1, 4).fills_line(3));
        // "Конец ." ends the document, which counts as a line end.
        assert!(Span::new(&doc, 4, 6).fills_line(3));
    }

    #[test]
    fn trim_non_word_drops_boundary_punctuation() {
        let doc = doc();
        let span = Span::new(&doc, 1, 4).trim_non_word();
        assert_eq!(span.text(), "Привет");
    }

    #[test]
    fn expand_to_prev_line_stops_at_break() {
        let doc = doc();
        let span = Span::new(&doc, 2, 4).expand_to_prev_line();
        assert_eq!(span.start(), 1);
    }

    #[test]
    fn round_parentheses_mark_a_stage_direction() {
        let doc = Fixture::new(vec![
            t("(").ws(""),
            t("шепотом").pos(Pos::Noun).ws(""),
            t(")"),
        ])
        .build();
        assert!(Span::new(&doc, 0, 3).is_parenthesized(3));
        assert!(Span::new(&doc, 1, 2).is_parenthesized(3));
    }

    #[test]
    fn quotation_marks_do_not_parenthesize() {
        let doc = Fixture::new(vec![
            t("«").ws(""),
            t("Да").pos(Pos::Intj).ws(""),
            t("»"),
        ])
        .build();
        assert!(!Span::new(&doc, 0, 3).is_parenthesized(3));
        assert!(!Span::new(&doc, 1, 2).is_parenthesized(3));
    }
}
