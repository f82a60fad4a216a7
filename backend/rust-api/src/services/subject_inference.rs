use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Subject;

/// One inference rule: if `matches` accepts the lowercased exercise text,
/// the exercise belongs to `subject`.
pub struct SubjectRule {
    pub subject: Subject,
    pub matches: fn(&str) -> bool,
}

lazy_static! {
    // Whole words only, so "summer" is not a sum and "country" is not a count.
    static ref MATH_WORDS: Regex = Regex::new(
        r"\bhow many\b|\b(?:add(?:s|ed|ing|ition)?|subtract(?:s|ed|ing|ion)?|plus|minus|times|multipl(?:y|ied|ies|ication)|divided?|divides|division|share[sd]?|count(?:s|ed|ing)?|total|sums?)\b|[+=]"
    )
    .expect("valid regex");
    static ref ENGLISH_WORDS: Regex = Regex::new(
        r"\b(?:unscramble|opposites?|rhym(?:e|es|ing)|spell(?:s|ed|ing)?|blanks?|words?|sentences?|letters?)\b"
    )
    .expect("valid regex");
    // `freez` is a stem: freeze, freezes, freezing.
    static ref SCIENCE_WORDS: Regex = Regex::new(
        r"\b(?:planets?|plants?|animals?|water|weather|sun|matter|freez\w*|froze)\b"
    )
    .expect("valid regex");
}

fn looks_like_math(text: &str) -> bool {
    MATH_WORDS.is_match(text)
}

fn looks_like_english(text: &str) -> bool {
    ENGLISH_WORDS.is_match(text)
}

fn looks_like_science(text: &str) -> bool {
    SCIENCE_WORDS.is_match(text)
}

/// Ordered by priority; the first matching rule wins.
pub const RULES: &[SubjectRule] = &[
    SubjectRule {
        subject: Subject::Math,
        matches: looks_like_math,
    },
    SubjectRule {
        subject: Subject::English,
        matches: looks_like_english,
    },
    SubjectRule {
        subject: Subject::Science,
        matches: looks_like_science,
    },
];

/// Guesses the subject of an exercise from its wording. Falls back to
/// `Subject::Other` when no rule matches.
pub fn infer_subject(exercise: &str) -> Subject {
    let text = exercise.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&text))
        .map(|rule| rule.subject)
        .unwrap_or(Subject::Other)
}
