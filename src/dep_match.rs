//! Dependency-tree probes shared by the extractor and the classifier.

use std::collections::HashSet;

use crate::document::Document;
use crate::token::{Dep, Pos};

/// Find a subject token inside `start..end` that is governed by a speaking
/// verb, directly or through a conjunct.
///
/// Direct link: a `nsubj` whose head is a speaking verb. Conjunct link: a
/// `nsubj` whose head has a child that is a speaking verb, covering shapes
/// like "повернулся и сказал Иван".
pub fn subject_of_speaking_verb(doc: &Document, start: usize, end: usize) -> Option<usize> {
    speaking_subjects(doc, start, end).into_iter().next()
}

/// All subject anchors of speaking verbs in `start..end`, in order.
pub fn speaking_subjects(doc: &Document, start: usize, end: usize) -> Vec<usize> {
    let mut anchors = Vec::new();
    for i in start..end.min(doc.len()) {
        if doc.token(i).dep != Dep::Nsubj {
            continue;
        }
        let head = doc.token(i).head;
        if head == i {
            continue;
        }
        let head_tok = doc.token(head);
        if head_tok.pos == Pos::Verb && head_tok.cues.is_speaking_verb {
            anchors.push(i);
            continue;
        }
        let conjunct_speaks = doc.children(head).iter().any(|&c| {
            let t = doc.token(c);
            t.pos == Pos::Verb && t.cues.is_speaking_verb
        });
        if conjunct_speaks {
            anchors.push(i);
        }
    }
    anchors
}

/// Whether `start..end` contains a subject/speaking-verb link at all.
pub fn has_speaker_verb_link(doc: &Document, start: usize, end: usize) -> bool {
    subject_of_speaking_verb(doc, start, end).is_some()
}

/// Whether a candidate author phrase hangs syntactically off the replica
/// buffer. That marks a complex sentence sharing a dash, not a genuine
/// author interruption.
pub fn depends_on(doc: &Document, start: usize, end: usize, phrase: &HashSet<usize>) -> bool {
    if phrase.is_empty() {
        return false;
    }
    for i in start..end.min(doc.len()) {
        let tok = doc.token(i);
        if !tok.cues.is_alpha || tok.dep == Dep::Parataxis {
            continue;
        }
        let ancestors: HashSet<usize> = doc.ancestors(i).collect();
        if !ancestors.is_empty() && ancestors.is_subset(phrase) {
            return true;
        }
    }
    false
}

/// The predicate a nominal is linked to: the nearest verbal ancestor, or a
/// copular auxiliary's head. In a verbless nominal sentence the root itself
/// stands in for the predicate.
pub fn linked_predicate(doc: &Document, index: usize) -> Option<usize> {
    for anc in doc.ancestors(index) {
        let tok = doc.token(anc);
        if tok.pos == Pos::Verb {
            return Some(anc);
        }
        if tok.pos == Pos::Aux && tok.dep == Dep::Cop {
            return Some(tok.head);
        }
    }
    let root = doc
        .ancestors(index)
        .last()
        .unwrap_or(index);
    if doc.token(root).pos.is_nominal() && !doc.sentence_has_verb(index) {
        return Some(root);
    }
    None
}
