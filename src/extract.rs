//! Replica extraction.
//!
//! A state machine walks the token stream and collects direct-speech
//! spans from three constructs: the dash opening a line, the colon-plus-
//! quote introduction, and plain quoted speech inside narration. Each
//! flushed replica remembers which boundary construct delimited it; the
//! classifier later turns those cues into search directions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dep_match::{depends_on, has_speaker_verb_link};
use crate::document::Document;
use crate::error::{PlayError, PlayResult};
use crate::span::Span;
use crate::token::Pos;

/// The boundary construct that delimited a replica, recorded at flush
/// time. It tells the classifier where author words stand relative to the
/// replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryCue {
    /// No adjacent author construct was detected.
    None,
    /// "Автор:" introduced the replica, before it.
    AfterAuthorStarting,
    /// ", — сказал он." follows the replica.
    BeforeAuthorEnding,
    /// An author phrase interrupts the replica mid-way.
    BeforeAuthorInsertion,
    /// A bare dash line with no author words anywhere nearby; speakers
    /// alternate.
    UnannotatedAlternation,
}

/// One extracted stretch of direct speech.
#[derive(Debug, Clone, Copy)]
pub struct Replica<'d> {
    span: Span<'d>,
    cue: BoundaryCue,
}

impl<'d> Replica<'d> {
    pub fn new(span: Span<'d>, cue: BoundaryCue) -> PlayResult<Self> {
        if span.is_empty() {
            return Err(PlayError::EmptyReplica);
        }
        Ok(Self { span, cue })
    }

    pub fn span(&self) -> Span<'d> {
        self.span
    }

    pub fn cue(&self) -> BoundaryCue {
        self.cue
    }

    pub fn text(&self) -> String {
        self.span.text()
    }
}

/// The ordered replicas of one document.
#[derive(Debug)]
pub struct Dialogue<'d> {
    doc: &'d Document,
    replicas: Vec<Replica<'d>>,
}

impl<'d> Dialogue<'d> {
    pub fn extract(doc: &'d Document) -> Self {
        Self {
            doc,
            replicas: extract_replicas(doc),
        }
    }

    pub fn doc(&self) -> &'d Document {
        self.doc
    }

    pub fn replicas(&self) -> &[Replica<'d>] {
        &self.replicas
    }

    pub fn len(&self) -> usize {
        self.replicas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicas.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Author,
    AuthorInsertion,
    /// Inside "— Реплика" opened by a line-initial dash.
    AfterNewlineDash,
    /// Inside "Автор: «Реплика»".
    AfterColonQuote,
    /// Inside quoted text that may turn out to be author speech.
    InQuote,
}

impl State {
    fn in_replica(self) -> bool {
        matches!(
            self,
            State::AfterNewlineDash | State::AfterColonQuote | State::InQuote
        )
    }
}

/// A matched author construct inside one physical line.
#[derive(Debug, Clone, Copy)]
struct AuthorMatch {
    /// Index of the opening punctuation token.
    start: usize,
    /// Index of the punctuation token closing the author body.
    close: usize,
    /// Exclusive end of the whole match.
    end: usize,
}

const ENDING_OPENERS: &[&str] = &[","];
const SENTENCE_CLOSERS: &[&str] = &[".", "…", "...", "!", "?"];
const INSERTION_CLOSERS: &[&str] = &[".", ";", ":", "…", "...", "!", "?"];
const CONTINUING_CLOSERS: &[&str] = &[",", ";", ":"];
const CONTINUING_OPENERS: &[&str] = &[",", "…", "..."];

/// Whether `start..end` can be the body of an author phrase: a speaking
/// verb plus a nominative or accusative nominal, within one sentence and
/// one line.
fn is_author_body(doc: &Document, start: usize, end: usize) -> bool {
    if start >= end {
        return false;
    }
    let mut has_verb = false;
    let mut has_nominal = false;
    for i in start..end {
        let tok = doc.token(i);
        if tok.cues.is_punct && tok.cues.is_sent_end {
            return false;
        }
        if i + 1 < end && tok.cues.has_newline {
            return false;
        }
        if tok.pos == Pos::Verb && tok.cues.is_speaking_verb {
            has_verb = true;
        }
        let nominal_pos = matches!(
            tok.pos,
            Pos::Noun | Pos::Propn | Pos::Pron | Pos::Adj | Pos::Num
        );
        if nominal_pos
            && matches!(
                tok.morph.case,
                Some(crate::morph::Case::Nom) | Some(crate::morph::Case::Acc)
            )
        {
            has_nominal = true;
        }
    }
    has_verb && has_nominal
}

/// Find the first "<punct> — <author body> <punct> — <word>" construct in
/// `from..to`. Sentence-closing openers demand a title-cased resumption
/// (the replica restarts a sentence); comma-like openers also allow the
/// lowercase continuation shape.
fn find_author_insertion(doc: &Document, from: usize, to: usize) -> Option<AuthorMatch> {
    let to = to.min(doc.len());
    for s in from..to {
        let opener = doc.token(s).text.as_str();
        let sentence_open = SENTENCE_CLOSERS.contains(&opener);
        let continuing_open = CONTINUING_OPENERS.contains(&opener);
        if !sentence_open && !continuing_open {
            continue;
        }
        if s + 1 >= to || !doc.token(s + 1).cues.is_dash {
            continue;
        }
        for close in s + 3..to {
            if close + 2 >= to {
                break;
            }
            if !doc.token(close + 1).cues.is_dash {
                continue;
            }
            let closer = doc.token(close).text.as_str();
            let resumed_title = doc.token(close + 2).cues.is_title;
            let shape_ok = (INSERTION_CLOSERS.contains(&closer) && resumed_title)
                || (continuing_open
                    && CONTINUING_CLOSERS.contains(&closer)
                    && !resumed_title);
            if !shape_ok {
                continue;
            }
            if is_author_body(doc, s + 2, close) {
                return Some(AuthorMatch {
                    start: s,
                    close,
                    end: close + 3,
                });
            }
        }
    }
    None
}

/// Find every ", — <author body><.…!?>" construct in `from..to`, leftmost
/// and shortest first.
fn find_author_endings(doc: &Document, from: usize, to: usize) -> Vec<AuthorMatch> {
    let to = to.min(doc.len());
    let mut out = Vec::new();
    for s in from..to {
        if !ENDING_OPENERS.contains(&doc.token(s).text.as_str()) {
            continue;
        }
        if s + 1 >= to || !doc.token(s + 1).cues.is_dash {
            continue;
        }
        for f in s + 3..to {
            if !SENTENCE_CLOSERS.contains(&doc.token(f).text.as_str()) {
                continue;
            }
            if is_author_body(doc, s + 2, f) {
                out.push(AuthorMatch {
                    start: s,
                    close: f,
                    end: f + 1,
                });
                break;
            }
        }
    }
    out
}

fn flush<'d>(
    doc: &'d Document,
    buf: &mut Vec<usize>,
    out: &mut Vec<Replica<'d>>,
    cue: BoundaryCue,
) {
    if let (Some(&first), Some(&last)) = (buf.first(), buf.last()) {
        let span = Span::new(doc, first, last + 1);
        trace!(text = %span.text(), ?cue, "flushing replica");
        if let Ok(replica) = Replica::new(span, cue) {
            out.push(replica);
        }
    }
    buf.clear();
}

/// Extract every replica of the document, in order.
pub fn extract_replicas(doc: &Document) -> Vec<Replica<'_>> {
    let n = doc.len();
    let mut replicas: Vec<Replica<'_>> = Vec::new();
    let mut buf: Vec<usize> = Vec::new();
    let mut states = vec![State::Author];

    let mut ti = 0usize;
    while ti < n {
        let t = doc.token(ti);
        let pt = ti.checked_sub(1).map(|i| doc.token(i));
        let nt = (ti + 1 < n).then(|| doc.token(ti + 1));
        let nnt = (ti + 2 < n).then(|| doc.token(ti + 2));
        let state = states[states.len() - 1];

        match state {
            State::InQuote => {
                if t.cues.is_close_quote {
                    if t.cues.has_newline || nt.map_or(false, |x| x.cues.has_newline) {
                        flush(doc, &mut buf, &mut replicas, BoundaryCue::None);
                    } else if nt.map_or(false, |x| x.cues.is_dash)
                        || (nt.map_or(false, |x| x.cues.is_punct)
                            && nnt.map_or(false, |x| x.cues.is_dash))
                    {
                        flush(doc, &mut buf, &mut replicas, BoundaryCue::BeforeAuthorEnding);
                    } else {
                        // Quoted author speech, not a replica.
                        buf.clear();
                    }
                    states.push(State::Author);
                } else if pt.map_or(false, |p| p.cues.is_punct) && t.cues.is_dash {
                    flush(
                        doc,
                        &mut buf,
                        &mut replicas,
                        BoundaryCue::BeforeAuthorInsertion,
                    );
                    states.push(State::AuthorInsertion);
                } else {
                    buf.push(ti);
                }
            }

            State::AfterColonQuote => {
                if t.cues.is_close_quote {
                    flush(
                        doc,
                        &mut buf,
                        &mut replicas,
                        BoundaryCue::AfterAuthorStarting,
                    );
                    states.push(State::Author);
                } else {
                    buf.push(ti);
                }
            }

            State::AfterNewlineDash => {
                if t.cues.has_newline {
                    buf.push(ti);
                    let introduced = buf
                        .first()
                        .and_then(|&f| f.checked_sub(2))
                        .map_or(false, |i| doc.token(i).text == ":");
                    let cue = if introduced {
                        BoundaryCue::AfterAuthorStarting
                    } else {
                        BoundaryCue::UnannotatedAlternation
                    };
                    flush(doc, &mut buf, &mut replicas, cue);
                    states.push(State::Author);
                } else if pt.map_or(false, |p| p.cues.is_punct) && t.cues.is_dash {
                    let prev_punct = pt.map_or("", |p| p.text.as_str());

                    // Onomatopoeia stays inside the replica:
                    // "— Из кустов — кря! — донеслось..."
                    if prev_punct == "!"
                        && nt.map_or(false, |x| !x.cues.is_title)
                        && buf.len() > 2
                        && doc.token(buf[buf.len() - 3]).cues.is_dash
                        && (!matches!(
                            doc.token(buf[buf.len() - 2]).pos,
                            Pos::Noun | Pos::Propn | Pos::Pron
                        )
                            || (buf.len() > 3
                                && doc.token(buf[buf.len() - 2]).lemma
                                    == doc.token(buf[buf.len() - 4]).lemma))
                    {
                        buf.push(ti);
                        ti += 1;
                        continue;
                    }

                    let phrase: HashSet<usize> = buf
                        .iter()
                        .copied()
                        .filter(|&i| doc.token(i).cues.is_alpha)
                        .collect();

                    let probe_from = ti - 1;
                    let mut line_end = n - 1;
                    for i in probe_from..n {
                        if doc.token(i).cues.has_newline {
                            line_end = i;
                            break;
                        }
                    }
                    let probe_to = line_end + 1;

                    if let Some(m) = find_author_insertion(doc, probe_from, probe_to) {
                        if has_speaker_verb_link(doc, m.start, m.end)
                            || !depends_on(doc, m.start, m.end, &phrase)
                        {
                            flush(
                                doc,
                                &mut buf,
                                &mut replicas,
                                BoundaryCue::BeforeAuthorInsertion,
                            );
                            // Resume right after the dash closing the
                            // insertion.
                            ti = m.close + 2;
                            continue;
                        }
                        // A dash shared with the surrounding sentence;
                        // drop it and keep collecting.
                        ti += 1;
                        continue;
                    }

                    // The speech sentence already closed before the dash,
                    // so whatever follows is a plain author remark even
                    // without a recognizable attribution shape.
                    if !matches!(prev_punct, "," | ";") {
                        flush(doc, &mut buf, &mut replicas, BoundaryCue::BeforeAuthorEnding);
                        states.push(State::AuthorInsertion);
                        ti += 1;
                        continue;
                    }

                    let mut handled = false;
                    for m in find_author_endings(doc, probe_from, probe_to) {
                        // An interior match is an interrogative tail of
                        // the speech itself, not an author ending.
                        if m.start != probe_from && doc.token(m.start).cues.is_punct {
                            buf.push(ti);
                            handled = true;
                            break;
                        }
                        if has_speaker_verb_link(doc, m.start, m.end) {
                            flush(doc, &mut buf, &mut replicas, BoundaryCue::BeforeAuthorEnding);
                            states.push(State::Author);
                            ti = m.end;
                            handled = true;
                            break;
                        }
                        if depends_on(doc, m.start, m.end, &phrase) {
                            continue;
                        }
                        if m.end >= n - 1 || doc.token(m.end - 1).cues.has_newline {
                            flush(doc, &mut buf, &mut replicas, BoundaryCue::BeforeAuthorEnding);
                            states.push(State::Author);
                            ti = m.end;
                            handled = true;
                            break;
                        }
                    }
                    if handled {
                        if ti > probe_from + 1 {
                            // ti was moved past the ending.
                            continue;
                        }
                    } else {
                        buf.push(ti);
                    }
                } else {
                    buf.push(ti);
                }
            }

            State::Author | State::AuthorInsertion => {
                let line_initial = pt.map_or(true, |p| p.cues.has_newline);
                if line_initial && t.cues.is_dash {
                    // [Автор:]\n— Реплика
                    states.push(State::AfterNewlineDash);
                } else if pt.map_or(false, |p| p.text.contains(':')) && t.cues.is_open_quote {
                    // Автор: «Реплика»
                    states.push(State::AfterColonQuote);
                } else if t.cues.is_open_quote {
                    // «Реплика» — автор
                    states.push(State::InQuote);
                } else if state == State::AuthorInsertion
                    && pt.map_or(false, |p| p.cues.is_punct)
                    && t.cues.is_dash
                {
                    // The insertion closed; return to the replica state
                    // that preceded it.
                    let resumed = states[states.len() - 2];
                    states.push(resumed);
                }
            }
        }

        ti += 1;
    }

    if states[states.len() - 1].in_replica() {
        flush(doc, &mut buf, &mut replicas, BoundaryCue::None);
    }

    replicas
}
