use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

static BANK_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/bank");

/// Every question offers exactly this many answers.
pub const OPTION_COUNT: usize = 4;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    #[serde(rename = "correct")]
    pub correct_index: usize,
    pub difficulty: Difficulty,
    pub topic: String,
}

impl Question {
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("built-in question bank `{0}` not found")]
    Missing(String),
    #[error("question bank is empty")]
    Empty,
    #[error("question {index}: {reason}")]
    Invalid { index: usize, reason: String },
    #[error("unable to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct BankFile {
    name: String,
    questions: Vec<Question>,
}

/// Immutable, ordered set of questions a session samples from.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    name: String,
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        for (index, q) in questions.iter().enumerate() {
            if q.text.trim().is_empty() {
                return Err(BankError::Invalid {
                    index,
                    reason: "question text is empty".to_string(),
                });
            }
            if q.correct_index >= OPTION_COUNT {
                return Err(BankError::Invalid {
                    index,
                    reason: format!("correct answer {} is out of range", q.correct_index),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            questions,
        })
    }

    /// The chemistry bank compiled into the binary.
    pub fn chemistry() -> Result<Self, BankError> {
        Self::builtin("chemistry")
    }

    pub fn builtin(name: &str) -> Result<Self, BankError> {
        let contents = BANK_DIR
            .get_file(format!("{name}.json"))
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| BankError::Missing(name.to_string()))?;

        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let file: BankFile = serde_json::from_str(json)?;
        Self::new(file.name, file.questions)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_question(text: &str, difficulty: Difficulty, correct_index: usize) -> Question {
    Question {
        text: text.to_string(),
        options: [
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
        ],
        correct_index,
        difficulty,
        topic: "Test".to_string(),
    }
}
