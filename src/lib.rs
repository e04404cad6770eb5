//! Scoring and normalization engine for an OCA-style personality
//! questionnaire: 200 yes/maybe/no questions scored into ten scales, raw
//! scores mapped to age- and gender-normalized percentiles, and completed
//! sessions assembled into a final result record for persistence and
//! notification collaborators.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub mod bulk;
pub mod error;
pub mod keys;
pub mod norms;
pub mod scoring;
pub mod session;

pub use bulk::read_bulk;
pub use error::Error;
pub use keys::{get_question_key, QuestionKey};
pub use norms::{AgeBracket, Gender, NormEntry, NormTables, ScaleNorms};
pub use scoring::{
    calculate_percentiles, calculate_raw_scores, Answer, AnswerValue, Percentiles, RawScores,
    Scale, ScaleScores,
};
pub use session::{ClientInfo, TestResult, TestSession};

/// Number of questions in the questionnaire.
pub const TOTAL_QUESTIONS: usize = 200;

/// Validity-check questions, reported separately in the result.
pub const CONTROL_QUESTION_FIRST: u32 = 22;
pub const CONTROL_QUESTION_SECOND: u32 = 197;

/// The 200-question master set, bundled with the crate.
pub static QUESTIONS: Lazy<QuestionSet> = Lazy::new(|| {
    serde_json::from_str(include_str!("../resources/questions.json"))
        .expect("bundled resources/questions.json is well formed")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
}

/// The immutable question master set, loaded once at startup.
#[derive(Debug, Deserialize)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Question at a zero-based position in presentation order.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Question with the given id.
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// All questions in presentation order.
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
