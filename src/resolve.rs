//! The speaker-resolution cascade.
//!
//! Replicas are processed in document order over (previous, current,
//! next) triples. Each step of the cascade either names a speaker or
//! falls through to the next; a replica that exhausts the cascade lands
//! in the play with an absent speaker.
//!
//! Cascade order: same-line continuation, turn-taking alternation,
//! cue-directed attribution search (leading, trailing, or embedded
//! author text), the visual-isolation fallback over preceding narration,
//! and finally repetition of the previous speaker.

use tracing::debug;

use crate::config::ClassifierConfig;
use crate::dep_match::{linked_predicate, speaking_subjects};
use crate::document::Document;
use crate::extract::{BoundaryCue, Dialogue, Replica};
use crate::morph::{Case, Feature};
use crate::noun_chunk::{expand_to_noun_chunk, noun_chunks_in, NounChunk};
use crate::play::Play;
use crate::span::Span;
use crate::speaker::Speaker;
use crate::token::Pos;

/// Features a referential pronoun must share with its antecedent.
const REF_AGREEMENT: &[Feature] = &[Feature::Gender, Feature::Number];

pub struct SpeakerResolver<'d> {
    doc: &'d Document,
    config: ClassifierConfig,
}

impl<'d> SpeakerResolver<'d> {
    pub fn new(doc: &'d Document, config: ClassifierConfig) -> Self {
        Self { doc, config }
    }

    /// Run the cascade over every replica and build the play.
    pub fn resolve(&self, dialogue: &Dialogue<'d>) -> Play<'d> {
        let mut play = Play::new();
        let replicas = dialogue.replicas();
        for (i, &replica) in replicas.iter().enumerate() {
            let prev = i.checked_sub(1).map(|j| replicas[j]);
            let next = replicas.get(i + 1).copied();
            let speaker = self.resolve_replica(&mut play, prev, replica, next, i);
            play.push(replica, speaker);
        }
        play.sweep_referrals();
        play
    }

    fn resolve_replica(
        &self,
        play: &mut Play<'d>,
        prev: Option<Replica<'d>>,
        replica: Replica<'d>,
        next: Option<Replica<'d>>,
        index: usize,
    ) -> Option<Speaker<'d>> {
        let doc = self.doc;
        let span = replica.span();

        // Same-line continuation: the previous replica ends on this line,
        // so author speech merely interrupted one turn.
        if let Some(p) = prev {
            if p.span().end_line_no() == span.line_no() {
                debug!(replica = %span, "same-line continuation");
                return play.last_speaker();
            }
        }

        let one_line_apart = prev
            .map_or(false, |p| span.line_no() == p.span().end_line_no() + 1);

        // Turn-taking alternation on a visually isolated line.
        if one_line_apart
            && span.fills_line(self.config.line_isolation_radius)
            && play.distinct_speaker_count() >= self.config.alternation_min_speakers
        {
            if let Some(partner) = play.penultimate_distinct_speaker() {
                debug!(replica = %span, partner = %partner, "alternation");
                return Some(partner);
            }
        }

        match replica.cue() {
            BoundaryCue::AfterAuthorStarting => {
                let region = self.leading_region(span);
                self.search_for_speaker(play, region, replica)
            }
            BoundaryCue::BeforeAuthorEnding => {
                let region = self.trailing_region(span);
                self.search_for_speaker(play, region, replica)
                    .or_else(|| self.alternation_fallback(play, one_line_apart))
            }
            BoundaryCue::BeforeAuthorInsertion if next.is_some() => {
                let next_start = next.map_or(span.end(), |n| n.span().start());
                let mut region = Span::new(doc, span.end(), next_start.max(span.end()));
                if region.is_parenthesized(self.config.line_isolation_radius) {
                    // A parenthesized aside comments on the scene and
                    // names nobody.
                    region = Span::new(doc, span.end(), span.end());
                }
                self.search_for_speaker(play, region, replica)
                    .or_else(|| self.alternation_fallback(play, one_line_apart))
            }
            _ => {
                if span.fills_line(self.config.line_isolation_radius) {
                    if let Some(region) = self.preceding_narration(prev, span) {
                        if let Some(found) = self.search_for_speaker(play, region, replica)
                        {
                            return Some(found);
                        }
                    }
                }
                if index > 1 {
                    return play.last_speaker();
                }
                None
            }
        }
    }

    /// Author text before the replica: from its sentence start back to
    /// the beginning of the previous physical line when the introduction
    /// sits there.
    fn leading_region(&self, span: Span<'d>) -> Span<'d> {
        let doc = self.doc;
        let (sent_start, _) = doc.sentence_bounds(span.start());
        let mut start = sent_start.min(span.start());
        let end = span.start();
        if start == end && start > 0 {
            start -= 1;
        }
        if end - start < 2 && start > 2 && doc.token(start - 1).cues.has_newline {
            // The colon sits on the previous line together with the
            // speaker definition.
            start -= 2;
        }
        Span::new(doc, start, end).expand_to_prev_line()
    }

    /// Author text after the replica, through the end of its line.
    fn trailing_region(&self, span: Span<'d>) -> Span<'d> {
        let doc = self.doc;
        let last = span.end().saturating_sub(1);
        let (_, sent_end) = doc.sentence_bounds(last);
        let start = span.end().min(doc.len());
        let mut end = sent_end.max(start);
        if start == end && end < doc.len() {
            end += 1;
        }
        Span::new(doc, start, end.min(doc.len())).expand_to_next_line()
    }

    /// The nearest preceding narration sentence substantial enough to
    /// name somebody. Never reaches past the previous replica.
    fn preceding_narration(
        &self,
        prev: Option<Replica<'d>>,
        span: Span<'d>,
    ) -> Option<Span<'d>> {
        let doc = self.doc;
        let floor = prev.map_or(0, |p| p.span().end());
        let mut end = span.start();
        while end > floor {
            let (sent_start, _) = doc.sentence_bounds(end - 1);
            let start = sent_start.max(floor);
            let sentence = Span::new(doc, start, end);
            if sentence.word_len() >= self.config.min_author_sentence_len
                && !sentence.is_parenthesized(self.config.line_isolation_radius)
            {
                return Some(sentence);
            }
            if start == end {
                break;
            }
            end = start;
        }
        None
    }

    fn alternation_fallback(
        &self,
        play: &Play<'d>,
        one_line_apart: bool,
    ) -> Option<Speaker<'d>> {
        if one_line_apart
            && play.distinct_speaker_count() >= self.config.alternation_min_speakers
        {
            play.penultimate_distinct_speaker()
        } else {
            None
        }
    }

    fn agree(&self, a: usize, b: usize) -> bool {
        self.doc
            .token(a)
            .morph
            .agrees(&self.doc.token(b).morph, REF_AGREEMENT)
    }

    /// The shared search procedure behind the attribution steps.
    fn search_for_speaker(
        &self,
        play: &mut Play<'d>,
        region: Span<'d>,
        replica: Replica<'d>,
    ) -> Option<Speaker<'d>> {
        let doc = self.doc;

        // Explicit attribution: a subject governed by a speaking verb.
        // Prefer an anchor that does not repeat the previous speaker.
        let anchors: Vec<usize> = speaking_subjects(doc, region.start(), region.end())
            .into_iter()
            .filter(|&a| !replica.span().contains(a))
            .collect();
        let last_lemma = play.last_speaker().map(|s| s.lemma());
        let mut first_candidate: Option<Speaker<'d>> = None;
        for &anchor in &anchors {
            let candidate = if doc.token(anchor).cues.is_referential_pronoun {
                self.resolve_reference(play, anchor, replica)
            } else {
                expand_to_noun_chunk(doc, anchor)
                    .map(Speaker::from_chunk)
                    .unwrap_or_else(|| Speaker::from_token(doc, anchor))
            };
            if Some(candidate.lemma()) != last_lemma {
                return Some(candidate);
            }
            first_candidate.get_or_insert(candidate);
        }
        if let Some(candidate) = first_candidate {
            return Some(candidate);
        }

        // A referential chunk repeating the previous speaker.
        if let Some(prev_speaker) = play.last_speaker() {
            for chunk in noun_chunks_in(doc, region.start(), region.end()) {
                if !doc.token(chunk.root).cues.is_referential_pronoun {
                    continue;
                }
                let entities = self.region_entities(region);
                if let [only] = entities[..] {
                    if only.1 <= chunk.root {
                        return Some(self.entity_speaker(only));
                    }
                }
                if self.agree(chunk.root, prev_speaker.root()) {
                    return Some(prev_speaker);
                }
            }
        }

        if let Some(found) = self.entity_with_predicate(region) {
            return Some(found);
        }
        if let Some(found) = self.propn_with_predicate(region) {
            return Some(found);
        }
        self.chunk_with_predicate(region)
    }

    fn region_entities(&self, region: Span<'d>) -> Vec<(usize, usize)> {
        self.doc
            .entities()
            .iter()
            .copied()
            .filter(|&(s, e)| s >= region.start() && e <= region.end())
            .collect()
    }

    fn entity_speaker(&self, (start, end): (usize, usize)) -> Speaker<'d> {
        let doc = self.doc;
        let root = (start..end)
            .find(|&i| {
                let head = doc.token(i).head;
                head == i || head < start || head >= end
            })
            .unwrap_or(start);
        Speaker::new(Span::new(doc, start, end), root)
    }

    /// Named entity whose token links to a predicate. A dative entity
    /// under a plain past-singular verb is an experiencer, not a speaker
    /// ("Сзету показалось").
    fn entity_with_predicate(&self, region: Span<'d>) -> Option<Speaker<'d>> {
        let doc = self.doc;
        for entity in self.region_entities(region) {
            for i in entity.0..entity.1 {
                if let Some(verb) = linked_predicate(doc, i) {
                    let dative = doc.token(i).morph.case == Some(Case::Dat);
                    if !(dative && doc.token(verb).morph.is_sing_past_act()) {
                        return Some(self.entity_speaker(entity));
                    }
                }
            }
        }
        None
    }

    fn propn_with_predicate(&self, region: Span<'d>) -> Option<Speaker<'d>> {
        let doc = self.doc;
        for i in region.start()..region.end() {
            if doc.token(i).pos != Pos::Propn {
                continue;
            }
            let Some(chunk) = expand_to_noun_chunk(doc, i) else {
                continue;
            };
            if let Some(verb) = linked_predicate(doc, chunk.root) {
                if !doc.token(verb).morph.is_sing_past_act() {
                    return Some(Speaker::from_chunk(chunk));
                }
            }
        }
        None
    }

    fn chunk_with_predicate(&self, region: Span<'d>) -> Option<Speaker<'d>> {
        let doc = self.doc;
        for chunk in noun_chunks_in(doc, region.start(), region.end()) {
            for i in chunk.span.start()..chunk.span.end() {
                if let Some(verb) = linked_predicate(doc, i) {
                    if !doc.token(verb).morph.is_sing_past_act() {
                        return Some(Speaker::from_chunk(chunk));
                    }
                }
            }
        }
        None
    }

    /// Resolve a referential pronoun to a named speaker: memo first, the
    /// last two distinct speakers next, then the depth-capped backward
    /// window search. The bare pronoun itself is the last resort.
    fn resolve_reference(
        &self,
        play: &mut Play<'d>,
        reference: usize,
        replica: Replica<'d>,
    ) -> Speaker<'d> {
        if let Some(memoized) = play.memo_get(reference) {
            return memoized;
        }

        let recents = [play.last_speaker(), play.penultimate_distinct_speaker()];
        for candidate in recents.into_iter().flatten() {
            if self.agree(reference, candidate.root()) {
                play.memo_insert(reference, candidate);
                return candidate;
            }
        }

        for exclude_previous in [true, false] {
            let windows = self.reference_windows(play, replica, reference, exclude_previous);
            if let Some(chunk) = self.find_by_reference(&windows, reference) {
                let speaker = Speaker::from_chunk(chunk);
                play.memo_insert(reference, speaker);
                return speaker;
            }
        }

        Speaker::from_token(self.doc, reference)
    }

    /// Context windows for antecedent search, leftmost first: the gaps
    /// between the most recent replica boundaries, plus the stretch
    /// between the current replica and the reference itself.
    fn reference_windows(
        &self,
        play: &Play<'d>,
        replica: Replica<'d>,
        reference: usize,
        exclude_previous: bool,
    ) -> Vec<Span<'d>> {
        let doc = self.doc;
        let mut bounds: Vec<Span<'d>> =
            play.entries().iter().map(|(r, _)| r.span()).collect();
        bounds.push(replica.span());
        let take_from = bounds.len().saturating_sub(self.config.reference_depth);
        let bounds = &bounds[take_from..];

        let mut windows: Vec<Span<'d>> = Vec::new();
        let mut push = |w: Span<'d>| {
            let w = w.trim_non_word();
            if w.len() > 1 {
                windows.push(w);
            }
        };

        if play.entries().is_empty() {
            let lead = replica.span().start().min(reference);
            if lead > 0 {
                push(Span::new(doc, 0, lead));
            }
        }

        for pair in bounds.windows(2) {
            let between = (pair[0].end(), pair[1].start());
            if between.1 <= between.0 {
                continue;
            }
            if exclude_previous {
                // Cut already-assigned matching speakers out of the
                // window so the search cannot trivially rediscover them.
                let mut cuts: Vec<(usize, usize)> = play
                    .entries()
                    .iter()
                    .filter_map(|(_, s)| *s)
                    .filter(|s| {
                        s.span().start() >= between.0 && s.span().end() <= between.1
                    })
                    .filter(|s| self.agree(reference, s.root()))
                    .map(|s| (s.span().start(), s.span().end()))
                    .collect();
                cuts.sort_unstable();
                let mut cursor = between.0;
                for (cut_start, cut_end) in cuts {
                    if cut_start > cursor {
                        push(Span::new(doc, cursor, cut_start));
                    }
                    cursor = cursor.max(cut_end);
                }
                if cursor < between.1 {
                    push(Span::new(doc, cursor, between.1));
                }
            } else {
                push(Span::new(doc, between.0, between.1));
            }
        }

        if reference > replica.span().end() {
            push(Span::new(doc, replica.span().end(), reference));
        }

        windows
    }

    /// Depth-bounded backward search over the context windows, nearest
    /// window first, implemented as an explicit worklist.
    fn find_by_reference(
        &self,
        windows: &[Span<'d>],
        reference: usize,
    ) -> Option<NounChunk<'d>> {
        enum Task<'d> {
            Search {
                upto: usize,
                reference: usize,
                misses: usize,
                hops: usize,
            },
            Fallback(NounChunk<'d>),
        }

        let doc = self.doc;
        let mut stack = vec![Task::Search {
            upto: windows.len(),
            reference,
            misses: 0,
            hops: 0,
        }];

        while let Some(task) = stack.pop() {
            let (upto, reference, misses, hops) = match task {
                Task::Fallback(chunk) => return Some(chunk),
                Task::Search {
                    upto,
                    reference,
                    misses,
                    hops,
                } => (upto, reference, misses, hops),
            };
            if upto == 0 {
                continue;
            }
            let window = windows[upto - 1];

            let mut chunks = noun_chunks_in(doc, window.start(), window.end());
            chunks.sort_by_key(|c| std::cmp::Reverse(c.speaker_rank(doc)));

            let mut matched = false;
            for chunk in chunks {
                let matching_token = (chunk.span.start()..chunk.span.end()).find(|&i| {
                    doc.token(i).pos.is_nominal() && self.agree(i, reference)
                });
                let Some(antecedent) = matching_token else {
                    continue;
                };
                matched = true;
                let chunk_is_referential = doc
                    .token(chunk.root)
                    .cues
                    .is_referential_pronoun;
                if chunk_is_referential && hops + 1 < self.config.reference_depth {
                    // Chase the chain first; keep this chunk as the
                    // fallback answer.
                    stack.push(Task::Fallback(chunk));
                    stack.push(Task::Search {
                        upto: upto - 1,
                        reference: antecedent,
                        misses,
                        hops: hops + 1,
                    });
                } else {
                    return Some(chunk);
                }
                break;
            }

            if !matched && upto > 1 && misses + 1 < self.config.reference_depth {
                stack.push(Task::Search {
                    upto: upto - 1,
                    reference,
                    misses: misses + 1,
                    hops,
                });
            }
        }

        None
    }
}
