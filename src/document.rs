//! Annotated documents.
//!
//! A [`DraftDocument`] is the mutable carrier that correction passes edit.
//! Freezing it into a [`Document`] precomputes the derived indexes the
//! classifier consults on every lookup: children lists, subtree left edges,
//! sentence starts, and entity ranges.

use std::collections::BTreeSet;

use crate::token::{Pos, Token};

/// Mutable document under construction by the annotation pipeline.
#[derive(Debug, Clone, Default)]
pub struct DraftDocument {
    pub tokens: Vec<Token>,
    /// Character offsets (in the newline-stripped text) at which a newline
    /// stood in the original input.
    pub newline_offsets: BTreeSet<usize>,
}

/// Immutable annotated document. All spans borrow from it.
#[derive(Debug)]
pub struct Document {
    tokens: Vec<Token>,
    /// Token indices that open each sentence, ascending.
    sent_starts: Vec<usize>,
    /// Children of each token in the dependency tree.
    children: Vec<Vec<usize>>,
    /// Leftmost token index of each token's subtree.
    left_edges: Vec<usize>,
    /// Half-open token ranges of named entities, ascending and disjoint.
    entities: Vec<(usize, usize)>,
}

impl Document {
    /// Freeze a fully corrected draft, wiring up the derived indexes.
    pub(crate) fn freeze(draft: DraftDocument) -> Self {
        let tokens = draft.tokens;
        let n = tokens.len();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, tok) in tokens.iter().enumerate() {
            if tok.head != i && tok.head < n {
                children[tok.head].push(i);
            }
        }

        // Left edges are computed bottom-up: a token's subtree extends to
        // the leftmost edge among itself and its children's subtrees.
        // Iterating by increasing index converges because leftward children
        // always have smaller indices than their parent's final edge.
        let mut left_edges: Vec<usize> = (0..n).collect();
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..n {
                for &c in &children[i] {
                    if left_edges[c] < left_edges[i] {
                        left_edges[i] = left_edges[c];
                        changed = true;
                    }
                }
            }
        }

        let mut sent_starts = Vec::new();
        for (i, tok) in tokens.iter().enumerate() {
            if tok.sent_start {
                sent_starts.push(i);
            }
        }
        if sent_starts.first() != Some(&0) && n > 0 {
            sent_starts.insert(0, 0);
        }

        let mut entities = Vec::new();
        let mut i = 0;
        while i < n {
            match tokens[i].ent {
                Some(id) => {
                    let start = i;
                    while i < n && tokens[i].ent == Some(id) {
                        i += 1;
                    }
                    entities.push((start, i));
                }
                None => i += 1,
            }
        }

        Self {
            tokens,
            sent_starts,
            children,
            left_edges,
            entities,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Direct dependents of the token at `index`.
    pub fn children(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    /// Leftmost token of the subtree rooted at `index`.
    pub fn left_edge(&self, index: usize) -> usize {
        self.left_edges[index]
    }

    /// Head chain from the token's head up to the root, root excluded from
    /// repetition (the walk stops when a token heads itself).
    pub fn ancestors(&self, index: usize) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            current: index,
        }
    }

    /// Half-open token range of the sentence containing `index`.
    pub fn sentence_bounds(&self, index: usize) -> (usize, usize) {
        let pos = match self.sent_starts.binary_search(&index) {
            Ok(p) => p,
            Err(p) => p.saturating_sub(1),
        };
        let start = self.sent_starts.get(pos).copied().unwrap_or(0);
        let end = self
            .sent_starts
            .get(pos + 1)
            .copied()
            .unwrap_or(self.tokens.len());
        (start, end)
    }

    /// All named-entity ranges, in document order.
    pub fn entities(&self) -> &[(usize, usize)] {
        &self.entities
    }

    /// Whether the sentence containing `index` has any verb or auxiliary.
    pub fn sentence_has_verb(&self, index: usize) -> bool {
        let (start, end) = self.sentence_bounds(index);
        self.tokens[start..end]
            .iter()
            .any(|t| matches!(t.pos, Pos::Verb | Pos::Aux))
    }
}

/// Iterator over the head chain of a token, nearest first.
pub struct Ancestors<'d> {
    doc: &'d Document,
    current: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let head = self.doc.token(self.current).head;
        if head == self.current {
            return None;
        }
        self.current = head;
        Some(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::t;
    use crate::token::{Dep, Pos};

    fn two_sentence_doc() -> Document {
        crate::fixture::Fixture::new(vec![
            t("Иван").pos(Pos::Propn).dep(Dep::Nsubj).head(1),
            t("пришел").pos(Pos::Verb).dep(Dep::Root),
            t(".").dep(Dep::Punct).head(1),
            t("Он").pos(Pos::Pron).dep(Dep::Nsubj).head(4),
            t("сел").pos(Pos::Verb).dep(Dep::Root),
            t(".").dep(Dep::Punct).head(4),
        ])
        .build()
    }

    #[test]
    fn sentence_bounds_follow_sent_starts() {
        let doc = two_sentence_doc();
        assert_eq!(doc.sentence_bounds(0), (0, 3));
        assert_eq!(doc.sentence_bounds(2), (0, 3));
        assert_eq!(doc.sentence_bounds(4), (3, 6));
    }

    #[test]
    fn ancestors_walk_to_root() {
        let doc = two_sentence_doc();
        let chain: Vec<usize> = doc.ancestors(0).collect();
        assert_eq!(chain, vec![1]);
        assert!(doc.ancestors(1).next().is_none());
    }

    #[test]
    fn left_edge_covers_subtree() {
        let doc = two_sentence_doc();
        assert_eq!(doc.left_edge(1), 0);
        assert_eq!(doc.left_edge(4), 3);
    }
}
