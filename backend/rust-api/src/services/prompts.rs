use crate::models::{exercise::ExerciseRequest, hint::HintRequest, Difficulty, Subject};

pub const EXERCISE_SYSTEM_PROMPT: &str = "You are a helpful educational assistant that creates \
age-appropriate exercises for children. Always respond with valid JSON that can be parsed. Make \
sure exercises have clear, specific answers that fit the exercise-answer pair format.";

pub const HINT_SYSTEM_PROMPT: &str = "You are a helpful educational assistant that creates \
age-appropriate hints for children. Never reveal the answer. Always respond with valid JSON \
that can be parsed.";

pub fn exercise_prompt(req: &ExerciseRequest) -> String {
    let grade = req.grade;
    let difficulty = req.difficulty;

    let body = match req.subject {
        Subject::Math => format!(
            "You are an educational assistant creating age-appropriate math exercises for grade {grade} students.\n\
             Generate a {difficulty} level math problem with a clear numerical or short text answer.\n\n\
             For {difficulty} difficulty and grade {grade}:\n\
             - Easy: Simple addition, subtraction, or counting problems\n\
             - Medium: Multi-step arithmetic, simple word problems\n\
             - Hard: More complex word problems, beginning multiplication/division\n\n\
             Focus on: {focus}\n\n\
             The exercise should be fun, engaging, and have a single correct answer.",
            focus = math_focus(difficulty),
        ),
        Subject::English => format!(
            "You are an educational assistant creating age-appropriate English language exercises for grade {grade} students.\n\
             Generate a {difficulty} level English exercise with a clear, specific answer.\n\n\
             For {difficulty} difficulty and grade {grade}, choose ONE of these exercise types:\n\
             - Opposites: \"What is the opposite of [word]?\"\n\
             - Fill-in-the-blank: \"Complete the sentence: ___\"\n\
             - Word unscramble: \"Unscramble these letters to make a word: A-B-C-D\"\n\
             - Rhyming words: \"What rhymes with [word]?\"\n\
             - Spelling: \"How do you spell [simple word]?\"\n\
             - Categorization: \"Which word belongs in the group: [animals, colors, etc.]?\"\n\n\
             The exercise should have a single correct answer that is a word or short phrase."
        ),
        Subject::Science => format!(
            "You are an educational assistant creating age-appropriate science exercises for grade {grade} students.\n\
             Generate a {difficulty} level science question with a clear, specific answer.\n\n\
             For {difficulty} difficulty and grade {grade}, focus on:\n\
             - Easy: Basic facts about animals, plants, weather, or the human body\n\
             - Medium: Simple cause and effect relationships in nature\n\
             - Hard: Beginning concepts about the solar system, states of matter, or life cycles\n\n\
             The exercise should have a single correct answer that is a word, short phrase, or simple explanation."
        ),
        Subject::Other => format!(
            "You are an educational assistant creating age-appropriate {subject} exercises for grade {grade} students.\n\
             Generate a {difficulty} level problem with a clear answer. The exercise should be fun and engaging.",
            subject = req.subject_name.trim(),
        ),
    };

    format!(
        "{body}\n\n\
         Format your response as a JSON object with exactly these two fields:\n\
         {{\n  \"exercise\": \"The exercise here\",\n  \"answer\": \"The short answer here\"\n}}\n\n\
         Make sure the exercise is appropriate for grade {grade} students and the answer is clear and unambiguous."
    )
}

fn math_focus(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "numbers up to 20, adding or taking away",
        Difficulty::Medium => "numbers up to 100 and two-step word problems",
        Difficulty::Hard => "sharing into equal groups and repeated addition",
    }
}

/// `subject` is the resolved subject: the requested one, or the sniffed one.
pub fn hint_prompt(req: &HintRequest, subject: Subject) -> String {
    let guidance = match subject {
        Subject::Math => {
            "Point the student to the operation they need (adding, taking away, sharing) \
             or suggest counting with objects, without doing the calculation for them."
        }
        Subject::English => {
            "Give a clue about the word's meaning, its first letter, or a sound it makes, \
             without writing the word itself."
        }
        Subject::Science => {
            "Connect the question to something the student can see or feel in everyday \
             life, without naming the answer."
        }
        Subject::Other => "Suggest a way of thinking about the question without stating the answer.",
    };

    format!(
        "You are an educational assistant helping grade {grade} students with {subject} exercises.\n\
         For the exercise: \"{exercise}\" with the answer \"{answer}\", provide a helpful hint.\n\n\
         The hint should:\n\
         1. Guide the student toward the answer without giving it away completely\n\
         2. Be age-appropriate and encouraging\n\
         3. Be clear and concise (1-2 sentences)\n\n\
         {guidance}\n\n\
         Format your response as a JSON object with exactly this field:\n\
         {{\n  \"hint\": \"Your hint here\"\n}}",
        grade = req.grade,
        subject = subject_label(subject),
        exercise = req.exercise.trim(),
        answer = req.answer.trim(),
    )
}

fn subject_label(subject: Subject) -> &'static str {
    match subject {
        Subject::Math => "math",
        Subject::English => "English",
        Subject::Science => "science",
        Subject::Other => "school",
    }
}
