//! Client-side practice session for one subject.
//!
//! Mirrors the per-subject exercise page: the session moves
//! `Idle -> Generating -> Ready -> Hinting -> Ready`, holds the current
//! exercise, the stored answer, what the student typed, the last hint and
//! whether the last check was correct. Checking is synchronous and keeps
//! the session in `Ready`.

use crate::models::{
    exercise::ExerciseResult,
    hint::{GenerateHintRequest, HintResult},
    Difficulty, Subject,
};

pub mod client;

pub use client::PracticeClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticePhase {
    Idle,
    Generating,
    Ready,
    Hinting,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PracticeError {
    #[error("a request is already in progress")]
    Busy,
    #[error("there is no exercise yet")]
    NoExercise,
    #[error("type an answer first")]
    EmptyAnswer,
}

#[derive(Debug, Clone)]
pub struct PracticeSession {
    subject: Subject,
    grade: u8,
    difficulty: Difficulty,
    phase: PracticePhase,
    // Phase to return to when an in-flight request fails.
    resume_phase: PracticePhase,
    exercise: Option<ExerciseResult>,
    user_answer: String,
    hint: Option<String>,
    is_correct: Option<bool>,
}

impl PracticeSession {
    pub fn new(subject: Subject, grade: u8) -> Self {
        Self {
            subject,
            grade,
            difficulty: Difficulty::Easy,
            phase: PracticePhase::Idle,
            resume_phase: PracticePhase::Idle,
            exercise: None,
            user_answer: String::new(),
            hint: None,
            is_correct: None,
        }
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn grade(&self) -> u8 {
        self.grade
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> PracticePhase {
        self.phase
    }

    pub fn exercise(&self) -> Option<&str> {
        self.exercise.as_ref().map(|e| e.exercise.as_str())
    }

    pub fn user_answer(&self) -> &str {
        &self.user_answer
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn set_user_answer(&mut self, answer: impl Into<String>) {
        self.user_answer = answer.into();
    }

    /// Enters `Generating`, clearing the previous check result, input and hint.
    pub fn begin_generation(&mut self) -> Result<(), PracticeError> {
        self.ensure_not_busy()?;
        self.resume_phase = self.phase;
        self.phase = PracticePhase::Generating;
        self.is_correct = None;
        self.user_answer.clear();
        self.hint = None;
        Ok(())
    }

    /// Completes generation. `None` (a failed request) keeps whatever
    /// exercise was shown before.
    pub fn finish_generation(&mut self, result: Option<ExerciseResult>) {
        if self.phase != PracticePhase::Generating {
            return;
        }
        match result {
            Some(exercise) if !exercise.exercise.is_empty() => {
                self.exercise = Some(exercise);
                self.phase = PracticePhase::Ready;
            }
            _ => self.phase = self.resume_phase,
        }
    }

    /// Trimmed, case-insensitive comparison against the stored answer.
    pub fn check_answer(&mut self) -> Result<bool, PracticeError> {
        self.ensure_not_busy()?;
        let exercise = self.exercise.as_ref().ok_or(PracticeError::NoExercise)?;
        if self.user_answer.trim().is_empty() {
            return Err(PracticeError::EmptyAnswer);
        }
        let correct = answers_match(&self.user_answer, &exercise.answer);
        self.is_correct = Some(correct);
        Ok(correct)
    }

    /// Enters `Hinting` and returns the request body for the hint endpoint.
    pub fn begin_hint(&mut self) -> Result<GenerateHintRequest, PracticeError> {
        self.ensure_not_busy()?;
        let exercise = self.exercise.as_ref().ok_or(PracticeError::NoExercise)?;
        let request = GenerateHintRequest {
            exercise: Some(exercise.exercise.clone()),
            answer: Some(exercise.answer.clone()),
            grade: Some(self.grade),
            subject: Some(self.subject.as_str().to_string()),
        };
        self.resume_phase = self.phase;
        self.phase = PracticePhase::Hinting;
        Ok(request)
    }

    pub fn finish_hint(&mut self, result: Option<HintResult>) {
        if self.phase != PracticePhase::Hinting {
            return;
        }
        if let Some(hint) = result.filter(|h| !h.hint.is_empty()) {
            self.hint = Some(hint.hint);
        }
        self.phase = self.resume_phase;
    }

    /// Copies the stored answer into the input field.
    pub fn reveal_answer(&mut self) -> Result<&str, PracticeError> {
        self.ensure_not_busy()?;
        let exercise = self.exercise.as_ref().ok_or(PracticeError::NoExercise)?;
        self.user_answer = exercise.answer.clone();
        Ok(&self.user_answer)
    }

    fn ensure_not_busy(&self) -> Result<(), PracticeError> {
        match self.phase {
            PracticePhase::Generating | PracticePhase::Hinting => Err(PracticeError::Busy),
            PracticePhase::Idle | PracticePhase::Ready => Ok(()),
        }
    }
}

pub fn answers_match(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}
