//! Base noun-phrase expansion over the dependency tree.
//!
//! A chunk grows from a nominal head by walking dependency children on
//! each side through an allow-list, then merging constructs the parser
//! leaves unattached: agreement-matched adjacent nominals (unparsed
//! compounds), a trailing preposition with its case-bearing complement,
//! and a single coinciding named entity, which tightens the chunk.

use crate::document::Document;
use crate::morph::Feature;
use crate::span::Span;
use crate::token::{Dep, Pos};

/// Dependency labels under which a nominal heads a chunk of its own.
const CHUNK_DEPS: &[Dep] = &[
    Dep::Nsubj,
    Dep::NsubjPass,
    Dep::Obj,
    Dep::Iobj,
    Dep::Obl,
    Dep::Appos,
    Dep::Conj,
    Dep::Root,
];

const LEFT_WALK: &[Dep] = &[
    Dep::Det,
    Dep::Amod,
    Dep::Nmod,
    Dep::Appos,
    Dep::Flat,
    Dep::Nummod,
    Dep::Obl,
];

const RIGHT_WALK: &[Dep] = &[
    Dep::Amod,
    Dep::Nmod,
    Dep::Acl,
    Dep::Obl,
    Dep::Case,
    Dep::Appos,
    Dep::Flat,
];

const COMPOUND_AGREEMENT: &[Feature] = &[Feature::Gender, Feature::Number, Feature::Case];

/// A base noun phrase with its syntactic head.
#[derive(Debug, Clone, Copy)]
pub struct NounChunk<'d> {
    pub span: Span<'d>,
    /// Token index of the nominal head inside the chunk.
    pub root: usize,
}

impl<'d> NounChunk<'d> {
    /// How strongly this chunk's grammatical role suggests a speaker.
    /// Subjects outrank objects, objects outrank obliques.
    pub fn speaker_rank(&self, doc: &Document) -> i8 {
        match doc.token(self.root).dep {
            Dep::Nsubj => 4,
            Dep::NsubjPass => 3,
            Dep::Obj | Dep::Iobj => 2,
            Dep::Obl => 1,
            Dep::Root | Dep::Appos | Dep::Conj => 0,
            _ => -1,
        }
    }
}

/// Descend through children on one side of `from`, following the
/// allow-list, and return the deepest boundary token reached.
fn walk_side(doc: &Document, from: usize, leftward: bool, allow: &[Dep]) -> usize {
    let mut current = from;
    loop {
        let next = doc
            .children(current)
            .iter()
            .copied()
            .filter(|&c| {
                let on_side = if leftward { c < current } else { c > current };
                on_side && allow.contains(&doc.token(c).dep)
            })
            .reduce(|a, b| {
                // The farthest child on the walking side wins.
                if leftward {
                    a.min(b)
                } else {
                    a.max(b)
                }
            });
        match next {
            Some(c) => current = c,
            None => return current,
        }
    }
}

/// Expand a nominal head to its maximal noun-phrase span.
///
/// Returns `None` for non-nominal heads and for bare numerals or
/// determiners that would make meaningless standalone candidates.
pub fn expand_to_noun_chunk(doc: &Document, head: usize) -> Option<NounChunk<'_>> {
    if !doc.token(head).pos.is_nominal() {
        return None;
    }
    let (sent_start, sent_end) = doc.sentence_bounds(head);

    let mut start = walk_side(doc, head, true, LEFT_WALK).max(sent_start);
    let mut end = (walk_side(doc, head, false, RIGHT_WALK) + 1).min(sent_end);

    // Case markers at the front belong to the clause, not the name.
    while start < head && matches!(doc.token(start).dep, Dep::Case | Dep::Cc | Dep::Punct) {
        start += 1;
    }

    // Unparsed compounds: a directly adjacent nominal agreeing with the
    // head joins the chunk when no conjunction intervenes.
    while end < sent_end {
        let next = doc.token(end);
        if next.pos.is_nominal()
            && next
                .morph
                .agrees(&doc.token(head).morph, COMPOUND_AGREEMENT)
            && next.morph.case.is_some()
        {
            end += 1;
            continue;
        }
        break;
    }

    // Prepositional complement: "хозяин с ружьем".
    if end + 1 < sent_end
        && doc.token(end).pos == Pos::Adp
        && doc.token(end + 1).pos.is_nominal()
        && doc.token(end + 1).head >= start
        && doc.token(end + 1).head < end
    {
        end += 2;
    }

    // A single coinciding named entity tightens a loose chunk.
    if end - start > 2 {
        let inside: Vec<(usize, usize)> = doc
            .entities()
            .iter()
            .copied()
            .filter(|&(s, e)| s >= start && e <= end)
            .collect();
        if let [(s, e)] = inside[..] {
            start = s;
            end = e;
        }
    }

    if end - start == 1 && matches!(doc.token(start).pos, Pos::Num | Pos::Det) {
        return None;
    }

    Some(NounChunk {
        span: Span::new(doc, start, end),
        root: head,
    })
}

/// All base noun phrases of the document, left to right, non-nested.
pub fn noun_chunks(doc: &Document) -> Vec<NounChunk<'_>> {
    let mut chunks: Vec<NounChunk<'_>> = Vec::new();
    let mut covered_until = 0usize;

    for i in 0..doc.len() {
        let tok = doc.token(i);
        if !tok.pos.is_nominal() || !CHUNK_DEPS.contains(&tok.dep) {
            continue;
        }
        if doc.left_edge(i) < covered_until {
            continue;
        }
        if let Some(chunk) = expand_to_noun_chunk(doc, i) {
            if chunk.span.start() >= covered_until {
                covered_until = chunk.span.end();
                chunks.push(chunk);
            }
        }
    }

    chunks
}

/// Noun phrases fully contained in `start..end`.
pub fn noun_chunks_in(doc: &Document, start: usize, end: usize) -> Vec<NounChunk<'_>> {
    noun_chunks(doc)
        .into_iter()
        .filter(|c| c.span.start() >= start && c.span.end() <= end)
        .collect()
}
