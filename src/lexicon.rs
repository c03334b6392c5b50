//! Closed word classes and punctuation inventories for Russian prose.
//!
//! These sets drive the cue pass in [`crate::annotate`]. They are lemma
//! based, so the upstream annotation must supply dictionary forms.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Dashes that may introduce direct speech.
pub static DASHES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["-", "–", "—"].into_iter().collect());

/// Opening quotation marks.
pub static OPEN_QUOTES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["«", "„", "“", "\"", "'"].into_iter().collect());

/// Closing quotation marks.
pub static CLOSE_QUOTES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["»", "“", "”", "\"", "'"].into_iter().collect());

/// Punctuation that may terminate a sentence.
pub static SENT_ENDS: Lazy<HashSet<char>> =
    Lazy::new(|| ['.', '!', '?', '…'].into_iter().collect());

/// Lemma stems of utterance verbs. Matching is by substring so that
/// prefixed derivations (переспросить, досказать) are covered.
pub static SPEAKING_VERBS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "говор",
        "говар",
        "сказа",
        "спрос",
        "спраш",
        "ответ",
        "отвеч",
        "воскли",
        "восклица",
        "шепта",
        "шепну",
        "крикну",
        "крича",
        "закрича",
        "вскрича",
        "бормота",
        "бормотну",
        "промолви",
        "молви",
        "замети",
        "замеча",
        "добави",
        "добавля",
        "продолжи",
        "продолжа",
        "произнес",
        "произнос",
        "отозва",
        "отзыва",
        "возрази",
        "возража",
        "согласи",
        "соглаша",
        "подтверди",
        "подтвержда",
        "приказа",
        "приказыва",
        "рявкну",
        "буркну",
        "хмыкну",
        "ворча",
        "проворча",
        "усмехну",
        "вздохну",
        "выдохну",
        "протяну",
        "перебива",
        "переби",
        "осведоми",
        "поинтересова",
        "обрати",
        "обраща",
        "вмеша",
        "откликну",
        "отрезна",
        "отреза",
        "повтори",
        "повторя",
        "пробормота",
        "прошепта",
        "прошипе",
        "шипе",
        "объяви",
        "объявля",
        "объясни",
        "объясня",
        "уточни",
        "уточня",
        "напомни",
        "напомина",
        "процеди",
        "буркота",
        "фыркну",
        "гаркну",
        "заключи",
        "пожа",
        "заора",
        "ора",
        "завопи",
        "вопи",
        "твердить",
        "тверди",
    ]
});

/// Lemmas that refer to a character indirectly and require antecedent
/// resolution: personal and demonstrative pronouns plus generic descriptive
/// nouns.
pub static REFERRAL_PRON: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "он",
        "она",
        "оно",
        "они",
        "тот",
        "та",
        "то",
        "те",
        "этот",
        "эта",
        "это",
        "эти",
        "сам",
        "сама",
        "все",
        "кто-то",
        "некто",
        "незнакомец",
        "незнакомка",
        "мужчина",
        "женщина",
        "старик",
        "старуха",
        "парень",
        "девушка",
        "мальчик",
        "девочка",
        "голос",
        "собеседник",
        "собеседница",
        "гость",
        "хозяин",
        "хозяйка",
    ]
    .into_iter()
    .collect()
});

/// Word forms the tagger habitually mislabels; they are forced back to
/// verbhood by the correction pass.
pub static MISPREDICTED_VERBS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["бормочет"].into_iter().collect());

/// Imperatives mistagged when they open a sentence.
pub static MISPREDICTED_VERBS_SENT_START: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["беги", "поведай", "засветись", "забудь"]
        .into_iter()
        .collect()
});

/// Genuine particle word forms. A title-cased token tagged as a particle
/// whose lowercase form is missing here is usually a mistagged proper name.
pub static PARTICLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "а", "авось", "ах", "бишь", "благо", "более", "больше", "будто",
        "буквально", "бы", "бывает", "бывало", "было", "ведь", "во", "вовсе",
        "вон", "вот", "вроде", "вряд", "все", "всего", "всё", "где", "да",
        "давай", "даже", "дай", "далеко", "де", "действительно", "дескать",
        "едва", "единственно", "если", "ещё", "же", "знай", "и", "или",
        "именно", "ин", "исключительно", "ишь", "как", "какое", "кое",
        "куда", "ладно", "ли", "лишь", "лучше", "навряд", "небось",
        "неужели", "нехай", "нечего", "ни", "ничего", "но", "ну", "о",
        "однако", "окончательно", "оно", "отнюдь", "ох", "подлинно",
        "положительно", "почти", "просто", "прямо", "пускай", "пусть",
        "разве", "решительно", "ровно", "самое", "себе", "скорее", "словно",
        "смотри", "совершенно", "совсем", "спасибо", "сём", "так", "таки",
        "там", "тебе", "то", "тоже", "только", "точно", "уж", "ух",
        "хорошо", "хоть", "чай", "чего", "что", "чтоб", "чтобы", "эк",
        "это", "эх",
    ]
    .into_iter()
    .collect()
});

/// Suffixes that mark enclitic particles written solid with their host.
pub static PARTICLE_ENDINGS: &[&str] =
    &[" ли", " ль", "-то", "-тка", "-де", "-ка", "-точь", "-с"];

/// Whether the token text is a dialogue dash.
pub fn is_dash(text: &str) -> bool {
    DASHES.contains(text)
}

/// Whether a character terminates a sentence.
pub fn is_sentence_final(c: char) -> bool {
    SENT_ENDS.contains(&c)
}

/// Whether the lemma denotes an act of speaking.
pub fn is_speaking_verb(lemma: &str) -> bool {
    let lemma = lemma.to_lowercase();
    SPEAKING_VERBS.iter().any(|stem| lemma.contains(stem))
}
