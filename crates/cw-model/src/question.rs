//! Quiz questions.

/// Question type, inferred from the answer markers at extraction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuestionKind {
    /// One correct answer among several.
    SingleChoice,
    /// Several correct answers; every correct one must be picked.
    MultipleChoice,
    /// Two boolean candidates, exactly one correct.
    TrueFalse,
    /// Free text compared against the accepted answers.
    ShortAnswer,
}

impl QuestionKind {
    /// Whether learners pick among the listed answers.
    #[must_use]
    pub fn is_choice(self) -> bool {
        !matches!(self, Self::ShortAnswer)
    }
}

/// One candidate or accepted answer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Answer {
    pub text: String,
    pub correct: bool,
    pub feedback: Option<String>,
}

impl Answer {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
            feedback: None,
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// Violated question invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionError {
    #[error("question has no prompt")]
    EmptyPrompt,
    #[error("question has no answers")]
    NoAnswers,
    #[error("question has no correct answer")]
    NoCorrectAnswer,
    #[error("true/false question needs exactly two answers with one correct, found {answers} answers and {correct} correct")]
    InvalidTrueFalse { answers: usize, correct: usize },
}

/// A quiz question extracted from module source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Question {
    pub kind: QuestionKind,
    /// Optional short title (`::title::` prefix in source).
    pub title: Option<String>,
    /// Markdown prompt.
    pub prompt: String,
    pub answers: Vec<Answer>,
}

impl Question {
    pub fn new(kind: QuestionKind, prompt: impl Into<String>) -> Self {
        Self {
            kind,
            title: None,
            prompt: prompt.into(),
            answers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_answer(mut self, answer: Answer) -> Self {
        self.answers.push(answer);
        self
    }

    /// Number of answers marked correct.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    /// Check the invariants every exporter relies on.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.answers.is_empty() {
            return Err(QuestionError::NoAnswers);
        }
        let correct = self.correct_count();
        match self.kind {
            QuestionKind::TrueFalse if self.answers.len() != 2 || correct != 1 => {
                Err(QuestionError::InvalidTrueFalse {
                    answers: self.answers.len(),
                    correct,
                })
            }
            _ if correct == 0 => Err(QuestionError::NoCorrectAnswer),
            _ => Ok(()),
        }
    }
}
