//! Built-in vocabulary.

use crate::{ids, KeySpec, KeyType, Layout};
use KeyType::*;

const NEUTRAL: &str = "#f5f5f5";
const PRONOUN: &str = "#fff4d6";
const GREEN: &str = "#c8e6c9";
const RED: &str = "#ffcdd2";
const PURPLE: &str = "#e1bee7";
const ORANGE: &str = "#ffccbc";

/// `(id, label, type, colour, icon)`
type Row = (&'static str, &'static str, KeyType, &'static str, Option<&'static str>);

const DEFAULT: [Row; 24] = [
    ("i", "i", Pronoun, PRONOUN, None),
    ("questions", "QUESTIONS", Category, "#b3e5fc", Some("question-mark")),
    ("places", "PLACES", Category, NEUTRAL, Some("place")),
    ("social", "SOCIAL", Category, NEUTRAL, Some("phone-call")),
    ("time", "TIME", Category, "#ffd699", Some("wall-clock")),
    ("exit", "EXIT", Action, ORANGE, Some("home")),
    ("my", "my", Pronoun, PRONOUN, Some("myself")),
    ("can", "can", Verb, NEUTRAL, None),
    ("to", "to", Preposition, NEUTRAL, None),
    ("eat", "eat", Verb, GREEN, Some("binge-eating")),
    ("good", "good", Adjective, PURPLE, Some("like")),
    ("describe", "DESCRIBE", Category, PURPLE, Some("rainbow")),
    ("you", "you", Pronoun, PRONOUN, None),
    ("do", "do", Verb, NEUTRAL, None),
    ("drink", "drink", Verb, GREEN, Some("soda")),
    ("play", "play", Verb, GREEN, Some("rc-car")),
    ("stop", "stop", Verb, GREEN, Some("stop")),
    ("vocab", "VOCAB", Category, "#80deea", Some("alphabet")),
    ("it", "it", Pronoun, PRONOUN, None),
    ("dont", "don't", Verb, RED, Some("cancel")),
    ("like", "like", Verb, GREEN, Some("smile")),
    ("yes", "yes", Response, GREEN, Some("check-mark")),
    ("watch", "watch", Verb, GREEN, Some("video")),
    ("clear", "clear", Action, NEUTRAL, None),
];

const AFTER_I: [Row; 24] = [
    ("would", "would", Verb, NEUTRAL, None),
    ("am", "am", Verb, NEUTRAL, None),
    ("have", "have", Verb, NEUTRAL, None),
    ("got", "got", Verb, NEUTRAL, None),
    ("social", "SOCIAL", Category, NEUTRAL, Some("ancestors")),
    ("home", "HOME", Action, ORANGE, Some("home")),
    ("could", "could", Verb, NEUTRAL, None),
    ("can", "can", Verb, NEUTRAL, None),
    ("m", "'m", Verb, NEUTRAL, None),
    ("eat", "eat", Verb, GREEN, Some("binge-eating")),
    ("hurt", "hurt", Verb, RED, Some("hurt")),
    ("need", "need", Verb, GREEN, Some("need")),
    ("will", "will", Verb, NEUTRAL, None),
    ("do", "do", Verb, NEUTRAL, None),
    ("drink", "drink", Verb, GREEN, Some("soda")),
    ("play", "play", Verb, GREEN, Some("rc-car")),
    ("stop", "stop", Verb, GREEN, Some("stop")),
    ("buy", "buy", Verb, GREEN, Some("cash")),
    ("was", "was", Verb, NEUTRAL, None),
    ("dont", "don't", Verb, RED, Some("cancel")),
    ("like", "like", Verb, GREEN, Some("smile")),
    ("love", "love", Verb, "#ffb3ba", Some("love")),
    ("watch", "watch", Verb, GREEN, Some("video")),
    ("clear", "clear", Action, NEUTRAL, None),
];

const AFTER_I_LIKE: [Row; 24] = [
    ("i", "i", Pronoun, PRONOUN, None),
    ("questions", "QUESTIONS", Category, "#b3e5fc", Some("question-mark")),
    ("places", "PLACES", Category, NEUTRAL, Some("place")),
    ("people", "PEOPLE", Category, NEUTRAL, Some("ancestors")),
    ("time", "TIME", Category, "#ffd699", Some("wall-clock")),
    ("home", "HOME", Action, ORANGE, Some("home")),
    ("my", "my", Pronoun, PRONOUN, Some("myself")),
    ("todo", "to do", Verb, NEUTRAL, None),
    ("tohave", "to have", Verb, NEUTRAL, None),
    ("toeat", "to eat", Verb, GREEN, Some("binge-eating")),
    ("tocall", "to call", Verb, GREEN, Some("phone-call")),
    ("describe", "DESCRIBE", Category, PURPLE, Some("rainbow")),
    ("you", "you", Pronoun, PRONOUN, None),
    ("ed", "-ed", Suffix, NEUTRAL, None),
    ("todrink", "to drink", Verb, GREEN, Some("soda")),
    ("toplay", "to play", Verb, GREEN, Some("rc-car")),
    ("tostop", "to stop", Verb, GREEN, Some("stop")),
    ("vocab", "VOCAB", Category, "#80deea", Some("alphabet")),
    ("it", "it", Pronoun, PRONOUN, None),
    ("s", "-s", Suffix, NEUTRAL, None),
    ("tolike", "to like", Verb, GREEN, Some("smile")),
    ("tolisten", "to listen", Verb, GREEN, Some("listen")),
    ("towatch", "to watch", Verb, GREEN, Some("video")),
    ("clear", "clear", Action, NEUTRAL, None),
];

// Shared by `vocab` and `afterILikeToPlay`.
const PLAY_THINGS: [Row; 24] = [
    ("i", "i", Pronoun, PRONOUN, None),
    ("to", "to", Preposition, NEUTRAL, None),
    ("a", "a", Article, NEUTRAL, None),
    ("bicycle", "bicycle", Noun, GREEN, Some("bicycle")),
    ("videogame", "video game", Noun, GREEN, Some("game-console")),
    ("home", "HOME", Action, ORANGE, Some("home")),
    ("my", "my", Pronoun, PRONOUN, Some("myself")),
    ("ed", "-ed", Suffix, NEUTRAL, None),
    ("and", "and", Conjunction, NEUTRAL, None),
    ("puzzle", "puzzle", Noun, GREEN, Some("jigsaw")),
    ("boardgame", "board game", Noun, GREEN, Some("board-game")),
    ("colors", "colors", Category, PURPLE, Some("rainbow")),
    ("me", "me", Pronoun, PRONOUN, Some("myself")),
    ("ing", "-ing", Suffix, NEUTRAL, None),
    ("crayons", "crayons", Noun, GREEN, Some("crayons")),
    ("legos", "legos", Noun, GREEN, Some("construction")),
    ("sports", "sports", Noun, GREEN, Some("sports")),
    ("ball", "ball", Noun, GREEN, Some("beach-ball")),
    ("you", "you", Pronoun, PRONOUN, None),
    ("s", "-s", Suffix, NEUTRAL, None),
    ("cars", "cars", Noun, GREEN, Some("rc-car")),
    ("swing", "swing", Noun, GREEN, Some("swing")),
    ("watch", "watch", Verb, GREEN, Some("video")),
    ("clear", "clear", Action, NEUTRAL, None),
];

fn build(id: &str, rows: &[Row]) -> Layout {
    let keys = rows
        .iter()
        .map(|&(id, label, key_type, color, icon)| {
            let key = KeySpec::new(id, label, key_type).with_color(color);
            match icon {
                Some(icon) => key.with_icon(icon),
                None => key,
            }
        })
        .collect();
    Layout::new(id, keys)
}

/// All built-in layouts, `default` first.
pub(crate) fn layouts() -> Vec<Layout> {
    vec![
        build(ids::DEFAULT, &DEFAULT),
        build(ids::AFTER_I, &AFTER_I),
        build(ids::AFTER_I_LIKE, &AFTER_I_LIKE),
        build(ids::AFTER_I_LIKE_TO_PLAY, &PLAY_THINGS),
        build(ids::VOCAB, &PLAY_THINGS),
    ]
}
