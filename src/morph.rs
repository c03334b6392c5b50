//! Morphological feature bundles and agreement checks.
//!
//! Agreement between a referential pronoun and its candidate antecedent is
//! decided by comparing a fixed subset of features (usually gender and
//! number). A feature that is unannotated on both sides counts as equal,
//! mirroring how the upstream tagger leaves irrelevant slots empty.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Masc,
    Fem,
    Neut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    Sing,
    Plur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Case {
    Nom,
    Gen,
    Dat,
    Acc,
    Ins,
    Loc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tense {
    Past,
    Pres,
    Fut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Person {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerbForm {
    Fin,
    Inf,
    /// Adverbial participle (converb).
    Conv,
    Part,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voice {
    Act,
    Mid,
    Pass,
}

/// Which feature slot to compare during agreement checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Gender,
    Number,
    Case,
    Tense,
    Person,
    VerbForm,
    Voice,
}

/// Optional morphological annotations of a single token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morph {
    pub gender: Option<Gender>,
    pub number: Option<Number>,
    pub case: Option<Case>,
    pub tense: Option<Tense>,
    pub person: Option<Person>,
    pub verb_form: Option<VerbForm>,
    pub voice: Option<Voice>,
}

impl Morph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gender(mut self, g: Gender) -> Self {
        self.gender = Some(g);
        self
    }

    pub fn number(mut self, n: Number) -> Self {
        self.number = Some(n);
        self
    }

    pub fn case(mut self, c: Case) -> Self {
        self.case = Some(c);
        self
    }

    pub fn tense(mut self, t: Tense) -> Self {
        self.tense = Some(t);
        self
    }

    pub fn person(mut self, p: Person) -> Self {
        self.person = Some(p);
        self
    }

    pub fn verb_form(mut self, v: VerbForm) -> Self {
        self.verb_form = Some(v);
        self
    }

    pub fn voice(mut self, v: Voice) -> Self {
        self.voice = Some(v);
        self
    }

    fn feature_eq(&self, other: &Morph, feature: Feature) -> bool {
        match feature {
            Feature::Gender => self.gender == other.gender,
            Feature::Number => self.number == other.number,
            Feature::Case => self.case == other.case,
            Feature::Tense => self.tense == other.tense,
            Feature::Person => self.person == other.person,
            Feature::VerbForm => self.verb_form == other.verb_form,
            Feature::Voice => self.voice == other.voice,
        }
    }

    /// Number of requested features on which the two bundles disagree.
    pub fn distance(&self, other: &Morph, features: &[Feature]) -> usize {
        features
            .iter()
            .filter(|&&f| !self.feature_eq(other, f))
            .count()
    }

    /// True when the two bundles agree on every requested feature.
    pub fn agrees(&self, other: &Morph, features: &[Feature]) -> bool {
        self.distance(other, features) == 0
    }

    /// True when the verb morphology is third-singular past active, the
    /// shape that marks plain narration predicates.
    pub fn is_sing_past_act(&self) -> bool {
        self.number == Some(Number::Sing)
            && self.tense == Some(Tense::Past)
            && self.voice == Some(Voice::Act)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_on_gender_and_number() {
        let he = Morph::new().gender(Gender::Masc).number(Number::Sing);
        let hunter = Morph::new()
            .gender(Gender::Masc)
            .number(Number::Sing)
            .case(Case::Nom);
        assert!(he.agrees(&hunter, &[Feature::Gender, Feature::Number]));
        assert!(!he.agrees(&hunter, &[Feature::Case]));
    }

    #[test]
    fn unannotated_slots_count_as_equal() {
        let a = Morph::new();
        let b = Morph::new();
        assert_eq!(a.distance(&b, &[Feature::Gender, Feature::Number]), 0);
    }

    #[test]
    fn distance_counts_disagreements() {
        let a = Morph::new().gender(Gender::Fem).number(Number::Sing);
        let b = Morph::new().gender(Gender::Masc).number(Number::Sing);
        assert_eq!(a.distance(&b, &[Feature::Gender, Feature::Number]), 1);
    }
}
