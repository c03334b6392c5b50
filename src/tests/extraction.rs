//! Replica extraction over the punctuation conventions of Russian
//! dialogue: dash-led lines, colon-plus-quote introductions, quoted
//! speech with author interventions, and the author constructs that
//! interrupt or close a turn.

use crate::fixture::{plain, t, Fixture};
use crate::morph::{Case, Morph};
use crate::token::{Dep, Pos};
use crate::{BoundaryCue, Dialogue, Document};

fn texts(dialogue: &Dialogue<'_>) -> Vec<String> {
    dialogue.replicas().iter().map(|r| r.text()).collect()
}

#[test]
fn quoted_replica_with_trailing_attribution() {
    let doc = plain("«Далече ли до крепости?» – спросил я у своего ямщика");
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(texts(&dialogue), vec!["Далече ли до крепости?"]);
    assert_eq!(dialogue.replicas()[0].cue(), BoundaryCue::BeforeAuthorEnding);
}

#[test]
fn colon_and_quote_introduction() {
    let doc = plain("Старый священник подошел ко мне с вопросом: «Прикажете начинать?»");
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(texts(&dialogue), vec!["Прикажете начинать?"]);
    assert_eq!(
        dialogue.replicas()[0].cue(),
        BoundaryCue::AfterAuthorStarting
    );
}

#[test]
fn quoted_replica_with_intervention() {
    let doc = plain(
        "«Тише, – говорит она мне, – отец болен, при смерти, и желает с тобою проститься»",
    );
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(
        texts(&dialogue),
        vec![
            "Тише,",
            "отец болен, при смерти, и желает с тобою проститься"
        ]
    );
    assert_eq!(
        dialogue.replicas()[0].cue(),
        BoundaryCue::BeforeAuthorInsertion
    );
}

#[test]
fn quoted_author_speech_is_discarded() {
    // Quotation marks around a name, not around speech.
    let doc = plain("Он посмотрел на «Восход» и ушел.");
    let dialogue = Dialogue::extract(&doc);
    assert!(dialogue.is_empty());
}

/// "— Что есть счастье? — вдруг громко спрашивает Гриша."
fn mamleyev_question() -> Document {
    Fixture::new(vec![
        t("—").dep(Dep::Punct).head(8),
        t("Что").pos(Pos::Pron),
        t("есть").pos(Pos::Verb).lemma("быть"),
        t("счастье").pos(Pos::Noun).ws(""),
        t("?").dep(Dep::Punct),
        t("—").dep(Dep::Punct).head(8),
        t("вдруг").pos(Pos::Adv).dep(Dep::Advmod).head(8),
        t("громко").pos(Pos::Adv).dep(Dep::Advmod).head(8),
        t("спрашивает")
            .lemma("спрашивать")
            .pos(Pos::Verb)
            .dep(Dep::Root),
        t("Гриша")
            .pos(Pos::Propn)
            .dep(Dep::Nsubj)
            .head(8)
            .morph(Morph::new().case(Case::Nom))
            .ws(""),
        t(".").dep(Dep::Punct).head(8),
    ])
    .build()
}

#[test]
fn sentence_final_dash_hands_over_to_author() {
    let doc = mamleyev_question();
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(texts(&dialogue), vec!["Что есть счастье?"]);
    assert_eq!(dialogue.replicas()[0].cue(), BoundaryCue::BeforeAuthorEnding);
}

#[test]
fn trailing_comma_ending_keeps_the_comma() {
    // "— Счастье — это довольство... И чтоб никаких мыслей, — наконец
    // проговаривается Михайло."
    let doc = Fixture::new(vec![
        t("—").dep(Dep::Punct).head(4),
        t("Счастье").pos(Pos::Noun),
        t("—").dep(Dep::Punct).head(4),
        t("это").pos(Pos::Part),
        t("довольство").pos(Pos::Noun).dep(Dep::Root).ws(""),
        t("...").dep(Dep::Punct).head(4),
        t("И").pos(Pos::Cconj),
        t("чтоб").pos(Pos::Sconj),
        t("никаких").pos(Pos::Det),
        t("мыслей").pos(Pos::Noun).ws(""),
        t(",").dep(Dep::Punct),
        t("—").dep(Dep::Punct).head(13),
        t("наконец").pos(Pos::Adv).dep(Dep::Advmod).head(13),
        t("проговаривается")
            .lemma("проговариваться")
            .pos(Pos::Verb)
            .dep(Dep::Root),
        t("Михайло")
            .pos(Pos::Propn)
            .dep(Dep::Nsubj)
            .head(13)
            .morph(Morph::new().case(Case::Nom))
            .ws(""),
        t(".").dep(Dep::Punct).head(13),
    ])
    .build();
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(
        texts(&dialogue),
        vec!["Счастье — это довольство... И чтоб никаких мыслей,"]
    );
    assert_eq!(dialogue.replicas()[0].cue(), BoundaryCue::BeforeAuthorEnding);
}

/// "– Ага, – согласился Лейтен, высокий крепыш с курчавыми волосами. –
/// Это точно."
pub(crate) fn sanderson_agreement() -> Document {
    Fixture::new(vec![
        t("–").dep(Dep::Punct).head(4),
        t("Ага").pos(Pos::Intj).ws(""),
        t(",").dep(Dep::Punct),
        t("–").dep(Dep::Punct).head(4),
        t("согласился")
            .lemma("согласиться")
            .pos(Pos::Verb)
            .dep(Dep::Root),
        t("Лейтен")
            .pos(Pos::Propn)
            .dep(Dep::Nsubj)
            .head(4)
            .morph(Morph::new().case(Case::Nom))
            .ws(""),
        t(",").dep(Dep::Punct).head(8),
        t("высокий").pos(Pos::Adj).dep(Dep::Amod).head(8),
        t("крепыш").pos(Pos::Noun).dep(Dep::Dep).head(4),
        t("с").pos(Pos::Adp).dep(Dep::Case).head(11),
        t("курчавыми").pos(Pos::Adj).dep(Dep::Amod).head(11),
        t("волосами").pos(Pos::Noun).dep(Dep::Obl).head(8).ws(""),
        t(".").dep(Dep::Punct).head(4),
        t("–").dep(Dep::Punct).head(15),
        t("Это").pos(Pos::Pron),
        t("точно").pos(Pos::Adv).dep(Dep::Root).ws(""),
        t(".").dep(Dep::Punct).head(15).ws(""),
    ])
    .build()
}

#[test]
fn comma_insertion_splits_one_turn() {
    let doc = sanderson_agreement();
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(texts(&dialogue), vec!["Ага,", "Это точно."]);
    assert_eq!(
        dialogue.replicas()[0].cue(),
        BoundaryCue::BeforeAuthorInsertion
    );
}

#[test]
fn complex_sentence_dash_stays_inside() {
    // The dash before "мы этого не знаем" belongs to the sentence the
    // character is speaking, not to an author ending.
    let doc = plain(
        "Джон продолжил:\n— Делал ли что-нибудь для этого Штольц, что делал и как делал, — мы этого не знаем.",
    );
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(
        texts(&dialogue),
        vec!["Делал ли что-нибудь для этого Штольц, что делал и как делал, — мы этого не знаем."]
    );
    assert_eq!(
        dialogue.replicas()[0].cue(),
        BoundaryCue::AfterAuthorStarting
    );
}

#[test]
fn onomatopoeia_dash_is_interior() {
    let doc = plain("— Все тихо, и вдруг — бам! — заколотили в дверь.");
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(
        texts(&dialogue),
        vec!["Все тихо, и вдруг — бам! — заколотили в дверь."]
    );
}

#[test]
fn numeral_interjection_dash_is_interior() {
    // "— Все тихо — раз! — и готово." A counting word before the
    // exclamation gets the same treatment as an onomatopoeia.
    let doc = Fixture::new(vec![
        t("—").dep(Dep::Punct),
        t("Все").pos(Pos::Pron),
        t("тихо").pos(Pos::Adv),
        t("—").dep(Dep::Punct),
        t("раз").pos(Pos::Num).ws(""),
        t("!").dep(Dep::Punct),
        t("—").dep(Dep::Punct),
        t("и").pos(Pos::Cconj),
        t("готово").pos(Pos::Adj).ws(""),
        t(".").dep(Dep::Punct).ws(""),
    ])
    .build();
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(texts(&dialogue), vec!["Все тихо — раз! — и готово."]);
}

#[test]
fn dependent_clause_after_dash_stays_inside() {
    // "— Слушай, — перебивать меня не надо, — дай сказать." The middle
    // stretch has the surface shape of an author insertion, but it hangs
    // off the speech syntactically, so the dash belongs to the replica.
    let doc = Fixture::new(vec![
        t("—").dep(Dep::Punct).head(1),
        t("Слушай")
            .lemma("слушать")
            .pos(Pos::Verb)
            .dep(Dep::Root)
            .ws(""),
        t(",").dep(Dep::Punct).head(1),
        t("—").dep(Dep::Punct).head(7),
        t("перебивать")
            .lemma("перебивать")
            .pos(Pos::Verb)
            .head(7),
        t("меня")
            .lemma("я")
            .pos(Pos::Pron)
            .dep(Dep::Obj)
            .head(4)
            .morph(Morph::new().case(Case::Acc)),
        t("не").pos(Pos::Part).dep(Dep::Advmod).head(7),
        t("надо").pos(Pos::Adj).head(1).ws(""),
        t(",").dep(Dep::Punct).head(7),
        t("—").dep(Dep::Punct).head(10),
        t("дай").lemma("дать").pos(Pos::Verb).head(1),
        t("сказать").lemma("сказать").pos(Pos::Verb).head(10).ws(""),
        t(".").dep(Dep::Punct).head(1).ws(""),
    ])
    .build();
    let dialogue = Dialogue::extract(&doc);
    assert_eq!(
        texts(&dialogue),
        vec!["Слушай, — перебивать меня не надо, — дай сказать."]
    );
}

#[test]
fn extraction_is_idempotent() {
    let doc = sanderson_agreement();
    let bounds = |d: &Dialogue<'_>| -> Vec<(usize, usize, BoundaryCue)> {
        d.replicas()
            .iter()
            .map(|r| (r.span().start(), r.span().end(), r.cue()))
            .collect()
    };
    let first = Dialogue::extract(&doc);
    let second = Dialogue::extract(&doc);
    assert_eq!(bounds(&first), bounds(&second));
}

/// A single paragraph carrying three replicas of one speaker, split by a
/// recognizable insertion first and a bare author remark second.
#[test]
fn multiple_boundaries_in_one_paragraph() {
    let doc = Fixture::new(vec![
        t("–").dep(Dep::Punct).head(4),
        t("Нет").pos(Pos::Intj).ws(""),
        t("!").dep(Dep::Punct),
        t("–").dep(Dep::Punct).head(4),
        t("рявкнул").lemma("рявкнуть").pos(Pos::Verb).dep(Dep::Root),
        t("Каладин")
            .pos(Pos::Propn)
            .dep(Dep::Nsubj)
            .head(4)
            .morph(Morph::new().case(Case::Nom))
            .ws(""),
        t(".").dep(Dep::Punct).head(4),
        t("–").dep(Dep::Punct).head(9),
        t("Вылазки")
            .pos(Pos::Noun)
            .dep(Dep::Nsubj)
            .head(9)
            .morph(Morph::new().case(Case::Nom)),
        t("выматывают")
            .lemma("выматывать")
            .pos(Pos::Verb)
            .dep(Dep::Root),
        t("нас")
            .lemma("мы")
            .pos(Pos::Pron)
            .dep(Dep::Obj)
            .head(9)
            .morph(Morph::new().case(Case::Acc))
            .ws(""),
        t(",").dep(Dep::Punct).head(9),
        t("–").dep(Dep::Punct).head(16),
        t("им")
            .lemma("они")
            .pos(Pos::Pron)
            .dep(Dep::Iobj)
            .head(16)
            .morph(Morph::new().case(Case::Dat)),
        t("нужно").pos(Pos::Adj).dep(Dep::Advmod).head(16),
        t("нас")
            .lemma("мы")
            .pos(Pos::Pron)
            .dep(Dep::Obj)
            .head(16)
            .morph(Morph::new().case(Case::Acc)),
        t("занять").lemma("занять").pos(Pos::Verb).dep(Dep::Root).ws(""),
        t(".").dep(Dep::Punct).head(16),
        t("Хочу").lemma("хотеть").pos(Pos::Verb).dep(Dep::Root),
        t("сделать").lemma("сделать").pos(Pos::Verb).dep(Dep::Dep).head(18),
        t("вас")
            .lemma("вы")
            .pos(Pos::Pron)
            .dep(Dep::Obj)
            .head(19)
            .morph(Morph::new().case(Case::Acc)),
        t("сильнее").pos(Pos::Adv).dep(Dep::Advmod).head(19).ws(""),
        t(".").dep(Dep::Punct).head(18),
        t("–").dep(Dep::Punct).head(25),
        t("Он")
            .lemma("он")
            .pos(Pos::Pron)
            .dep(Dep::Nsubj)
            .head(25)
            .morph(Morph::new().case(Case::Nom)),
        t("посмотрел")
            .lemma("посмотреть")
            .pos(Pos::Verb)
            .dep(Dep::Root),
        t("в").pos(Pos::Adp).dep(Dep::Case).head(27),
        t("глаза")
            .pos(Pos::Noun)
            .dep(Dep::Obj)
            .head(25)
            .morph(Morph::new().case(Case::Acc)),
        t("каждому")
            .lemma("каждый")
            .pos(Pos::Pron)
            .dep(Dep::Iobj)
            .head(25)
            .morph(Morph::new().case(Case::Dat))
            .ws(""),
        t(".").dep(Dep::Punct).head(25),
        t("–").dep(Dep::Punct).head(32),
        t("Я")
            .lemma("я")
            .pos(Pos::Pron)
            .dep(Dep::Nsubj)
            .head(32)
            .morph(Morph::new().case(Case::Nom)),
        t("знаю").lemma("знать").pos(Pos::Verb).dep(Dep::Root),
        t("способ")
            .pos(Pos::Noun)
            .dep(Dep::Obj)
            .head(32)
            .morph(Morph::new().case(Case::Acc))
            .ws(""),
        t(".").dep(Dep::Punct).head(32).ws(""),
    ])
    .build();

    let dialogue = Dialogue::extract(&doc);
    assert_eq!(
        texts(&dialogue),
        vec![
            "Нет!",
            "Вылазки выматывают нас, – им нужно нас занять. Хочу сделать вас сильнее.",
            "Я знаю способ."
        ]
    );
    assert_eq!(
        dialogue.replicas()[0].cue(),
        BoundaryCue::BeforeAuthorInsertion
    );
    assert_eq!(dialogue.replicas()[1].cue(), BoundaryCue::BeforeAuthorEnding);
}

#[test]
fn replicas_are_ordered_and_disjoint() {
    let doc = sanderson_agreement();
    let dialogue = Dialogue::extract(&doc);
    for pair in dialogue.replicas().windows(2) {
        assert!(pair[0].span().end() <= pair[1].span().start());
    }
    for replica in dialogue.replicas() {
        assert!(!replica.span().is_empty());
        assert!(!replica.text().is_empty());
    }
}
