//! Canned content served when the model is unreachable or its output is unusable.

use crate::models::{exercise::ExerciseResult, Difficulty, Subject};

pub const GENERIC_HINT: &str =
    "Think carefully about the question and use what you've learned in class!";

pub fn fallback_exercise(subject: Subject, difficulty: Difficulty) -> ExerciseResult {
    let (exercise, answer) = match (subject, difficulty) {
        (Subject::Math, Difficulty::Easy) => (
            "If you have 5 apples and your friend gives you 3 more apples, how many apples do you have now?",
            "8",
        ),
        (Subject::Math, Difficulty::Medium) => (
            "Sarah has 15 stickers. She gives 7 stickers to her friend. How many stickers does Sarah have left?",
            "8",
        ),
        (Subject::Math, Difficulty::Hard) => (
            "Tom has 24 marbles. He wants to share them equally among 4 friends. How many marbles will each friend get?",
            "6",
        ),
        (Subject::English, Difficulty::Easy) => ("What is the opposite of \"hot\"?", "cold"),
        (Subject::English, Difficulty::Medium) => {
            ("Unscramble these letters to make a word: C-A-T-H", "chat")
        }
        (Subject::English, Difficulty::Hard) => {
            ("Fill in the blank: The cat jumped _____ the table.", "onto")
        }
        (Subject::Science, Difficulty::Easy) => ("Name the planet we live on.", "Earth"),
        (Subject::Science, Difficulty::Medium) => (
            "What do plants need to grow? Name three things.",
            "water, sunlight, soil",
        ),
        (Subject::Science, Difficulty::Hard) => {
            ("What happens to water when it freezes?", "It turns into ice")
        }
        (Subject::Other, Difficulty::Easy) => ("Count from 1 to 10.", "1, 2, 3, 4, 5, 6, 7, 8, 9, 10"),
        (Subject::Other, Difficulty::Medium) => (
            "Name three animals that start with the letter \"B\".",
            "bear, bird, butterfly",
        ),
        (Subject::Other, Difficulty::Hard) => ("Name three states of matter.", "solid, liquid, gas"),
    };

    ExerciseResult::new(exercise, answer)
}

/// Phrase found in a canned exercise, paired with the hint written for it.
/// Checked in order; matching is case-insensitive.
const HINT_TABLE: &[(&str, &str)] = &[
    (
        "apples",
        "Try adding the numbers together. Remember, when you get more of something, you add!",
    ),
    (
        "stickers",
        "When you give something away, you have less than before. Try subtracting!",
    ),
    (
        "marbles",
        "Sharing equally means dividing. Try dividing the total number by the number of friends.",
    ),
    (
        "opposite",
        "Think about how you feel on a very cold winter day versus a hot summer day.",
    ),
    (
        "unscramble",
        "This word is something you might do with a friend - you talk or have a conversation.",
    ),
    (
        "blank",
        "Think about the position of the cat in relation to the table. If it jumped, where would it end up?",
    ),
    (
        "planet",
        "It's the third planet from the sun and the only one known to have life.",
    ),
    (
        "plants need",
        "Think about what you need to water your plants with, where you put them to get light, and what they grow in.",
    ),
    (
        "water when it freezes",
        "Think about what happens when you put water in the freezer. What does it turn into?",
    ),
    (
        "count from",
        "Start at 1 and say each number out loud, one after another.",
    ),
    (
        "letter \"b\"",
        "Think of animals that fly, swim, or live in the forest and say their names out loud.",
    ),
    (
        "states of matter",
        "Think about ice, water, and steam. They are all water in different forms!",
    ),
];

pub fn fallback_hint(exercise: &str) -> String {
    let text = exercise.to_lowercase();
    HINT_TABLE
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, hint)| *hint)
        .unwrap_or(GENERIC_HINT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn math_easy_fallback_is_the_apples_problem() {
        let result = fallback_exercise(Subject::Math, Difficulty::Easy);
        assert_eq!(
            result.exercise,
            "If you have 5 apples and your friend gives you 3 more apples, how many apples do you have now?"
        );
        assert_eq!(result.answer, "8");
    }

    #[test]
    fn every_subject_and_difficulty_has_non_empty_content() {
        for subject in [Subject::Math, Subject::English, Subject::Science, Subject::Other] {
            for difficulty in Difficulty::ALL {
                let result = fallback_exercise(subject, difficulty);
                assert!(!result.exercise.is_empty(), "{subject}/{difficulty}");
                assert!(!result.answer.is_empty(), "{subject}/{difficulty}");
            }
        }
    }

    #[test]
    fn every_canned_exercise_has_a_specific_hint() {
        for subject in [Subject::Math, Subject::English, Subject::Science, Subject::Other] {
            for difficulty in Difficulty::ALL {
                let exercise = fallback_exercise(subject, difficulty).exercise;
                assert_ne!(fallback_hint(&exercise), GENERIC_HINT, "{exercise}");
            }
        }
    }

    #[test]
    fn hint_matching_ignores_case() {
        assert_eq!(
            fallback_hint("UNSCRAMBLE these letters: O-D-G"),
            fallback_hint("Unscramble these letters to make a word: C-A-T-H")
        );
    }

    #[test]
    fn unknown_exercise_gets_generic_encouragement() {
        assert_eq!(fallback_hint("Who wrote Hamlet?"), GENERIC_HINT);
    }
}
