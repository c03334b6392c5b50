//! The ordered replica-to-speaker log.
//!
//! `Play` is append-only: the resolver pushes one entry per replica in
//! document order and later entries may consult everything already pushed.
//! Alternation queries and the reference memo live here so the resolver
//! carries no state of its own.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::extract::Replica;
use crate::lexicon;
use crate::speaker::{Speaker, SpeakerRecord};

/// One resolved line of the transcript, owned and serializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    pub replica: String,
    pub speaker: Option<SpeakerRecord>,
}

#[derive(Debug, Default)]
pub struct Play<'d> {
    entries: Vec<(Replica<'d>, Option<Speaker<'d>>)>,
    /// Resolved referential pronouns, by token index.
    reference_memo: HashMap<usize, Speaker<'d>>,
    misses: usize,
}

impl<'d> Play<'d> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            reference_memo: HashMap::new(),
            misses: 0,
        }
    }

    /// Append the next replica in document order. An unresolved speaker
    /// counts as a diagnostic miss, never as an error.
    pub fn push(&mut self, replica: Replica<'d>, speaker: Option<Speaker<'d>>) {
        if speaker.is_none() {
            self.misses += 1;
            warn!(replica = %replica.span(), "no speaker resolved");
        }
        self.entries.push((replica, speaker));
    }

    pub fn entries(&self) -> &[(Replica<'d>, Option<Speaker<'d>>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of replicas that got no speaker.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Speaker of the most recently pushed replica, resolved or not.
    pub fn last_speaker(&self) -> Option<Speaker<'d>> {
        self.entries.last().and_then(|(_, s)| *s)
    }

    /// Speaker lemmas in most-recent-first order, deduplicated.
    pub fn speaker_lemmas(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for (_, speaker) in self.entries.iter().rev() {
            if let Some(s) = speaker {
                let lemma = s.lemma();
                if !seen.contains(&lemma) {
                    seen.push(lemma);
                }
            }
        }
        seen
    }

    /// Number of distinct resolved speakers so far.
    pub fn distinct_speaker_count(&self) -> usize {
        self.speaker_lemmas().len()
    }

    /// The alternation partner: the most recent speaker whose lemma
    /// differs from the last speaker's.
    pub fn penultimate_distinct_speaker(&self) -> Option<Speaker<'d>> {
        let lemmas = self.speaker_lemmas();
        let partner = lemmas.get(1)?;
        self.entries
            .iter()
            .rev()
            .filter_map(|(_, s)| *s)
            .find(|s| &s.lemma() == partner)
    }

    /// Replicas grouped per speaker lemma; unresolved entries group under
    /// `None`.
    pub fn by_speaker(&self) -> HashMap<Option<String>, Vec<Replica<'d>>> {
        let mut groups: HashMap<Option<String>, Vec<Replica<'d>>> = HashMap::new();
        for (replica, speaker) in &self.entries {
            groups
                .entry(speaker.as_ref().map(Speaker::lemma))
                .or_default()
                .push(*replica);
        }
        groups
    }

    pub fn memo_get(&self, reference: usize) -> Option<Speaker<'d>> {
        self.reference_memo.get(&reference).copied()
    }

    pub fn memo_insert(&mut self, reference: usize, speaker: Speaker<'d>) {
        self.reference_memo.insert(reference, speaker);
    }

    /// A replica whose resolved speaker is itself a bare referential
    /// pronoun inherits the previous replica's speaker.
    pub fn sweep_referrals(&mut self) {
        for i in 1..self.entries.len() {
            let referential = matches!(
                &self.entries[i].1,
                Some(s) if lexicon::REFERRAL_PRON.contains(s.lemma().as_str())
            );
            if referential {
                self.entries[i].1 = self.entries[i - 1].1;
            }
        }
    }

    /// Owned transcript lines for serialization.
    pub fn lines(&self) -> Vec<LineRecord> {
        self.entries
            .iter()
            .map(|(replica, speaker)| LineRecord {
                replica: replica.text(),
                speaker: speaker.as_ref().map(Speaker::record),
            })
            .collect()
    }
}

impl fmt::Display for Play<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (replica, speaker) in &self.entries {
            match speaker {
                Some(s) => writeln!(f, "{}: {}", s.text(), replica.text())?,
                None => writeln!(f, "?: {}", replica.text())?,
            }
        }
        Ok(())
    }
}
