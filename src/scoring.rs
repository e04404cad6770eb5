//! Scoring engine: folds a set of answers into per-scale raw scores and maps
//! raw scores to percentiles through the norm tables.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::keys::get_question_key;
use crate::norms::{Gender, NormTables};

/// The ten personality dimensions measured by the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scale {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
}

impl Scale {
    pub const ALL: [Scale; 10] = [
        Scale::A,
        Scale::B,
        Scale::C,
        Scale::D,
        Scale::E,
        Scale::F,
        Scale::G,
        Scale::H,
        Scale::I,
        Scale::J,
    ];

    /// Human-readable trait name for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Scale::A => "Stability",
            Scale::B => "Happiness",
            Scale::C => "Composure",
            Scale::D => "Certainty",
            Scale::E => "Activity",
            Scale::F => "Drive",
            Scale::G => "Responsibility",
            Scale::H => "Objectivity",
            Scale::I => "Empathy",
            Scale::J => "Communication",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Scale::A => 'A',
            Scale::B => 'B',
            Scale::C => 'C',
            Scale::D => 'D',
            Scale::E => 'E',
            Scale::F => 'F',
            Scale::G => 'G',
            Scale::H => 'H',
            Scale::I => 'I',
            Scale::J => 'J',
        };
        write!(f, "{code}")
    }
}

/// One of the three permitted responses to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerValue {
    Yes,
    Maybe,
    No,
}

impl FromStr for AnswerValue {
    type Err = Error;

    /// Accepts the full word or its first letter, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Ok(AnswerValue::Yes),
            "m" | "maybe" => Ok(AnswerValue::Maybe),
            "n" | "no" => Ok(AnswerValue::No),
            _ => Err(Error::IllegalAnswer),
        }
    }
}

/// A recorded response to a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: u32,
    pub answer: AnswerValue,
}

/// One integer per scale. Serializes as `{"A": .., "B": .., ..}` so stored
/// results keep the shape the persistence collaborator expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct ScaleScores {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub e: i32,
    pub f: i32,
    pub g: i32,
    pub h: i32,
    pub i: i32,
    pub j: i32,
}

pub type RawScores = ScaleScores;
pub type Percentiles = ScaleScores;

impl Index<Scale> for ScaleScores {
    type Output = i32;

    fn index(&self, scale: Scale) -> &i32 {
        match scale {
            Scale::A => &self.a,
            Scale::B => &self.b,
            Scale::C => &self.c,
            Scale::D => &self.d,
            Scale::E => &self.e,
            Scale::F => &self.f,
            Scale::G => &self.g,
            Scale::H => &self.h,
            Scale::I => &self.i,
            Scale::J => &self.j,
        }
    }
}

impl IndexMut<Scale> for ScaleScores {
    fn index_mut(&mut self, scale: Scale) -> &mut i32 {
        match scale {
            Scale::A => &mut self.a,
            Scale::B => &mut self.b,
            Scale::C => &mut self.c,
            Scale::D => &mut self.d,
            Scale::E => &mut self.e,
            Scale::F => &mut self.f,
            Scale::G => &mut self.g,
            Scale::H => &mut self.h,
            Scale::I => &mut self.i,
            Scale::J => &mut self.j,
        }
    }
}

impl ScaleScores {
    pub fn iter(&self) -> impl Iterator<Item = (Scale, i32)> + '_ {
        Scale::ALL.into_iter().map(move |scale| (scale, self[scale]))
    }

    /// Single-line rendering, e.g. `A: +40 | B: 0 | ...`. Positive values
    /// carry an explicit sign.
    pub fn summary_line(&self) -> String {
        self.iter()
            .map(|(scale, value)| {
                if value > 0 {
                    format!("{scale}: +{value}")
                } else {
                    format!("{scale}: {value}")
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Fold the answer collection into raw per-scale totals.
///
/// All ten totals start at zero. Every answer adds the weight matching its
/// value to the total of its question's scale. An answer whose question id
/// has no key contributes nothing; that is a data-integrity warning, not an
/// error. The fold is a plain commutative sum, so answer order is irrelevant.
pub fn calculate_raw_scores(answers: &[Answer]) -> RawScores {
    let mut scores = RawScores::default();
    for answer in answers {
        match get_question_key(answer.question_id) {
            Some(key) => scores[key.scale] += key.weight(answer.answer),
            None => warn!(
                "no question key for id {}, answer ignored",
                answer.question_id
            ),
        }
    }
    scores
}

/// Map every raw scale score to its demographic percentile.
pub fn calculate_percentiles(
    raw_scores: &RawScores,
    gender: Gender,
    age: u32,
    norms: &NormTables,
) -> Percentiles {
    let mut percentiles = Percentiles::default();
    for scale in Scale::ALL {
        percentiles[scale] = norms.percentile(gender, age, scale, raw_scores[scale]);
    }
    percentiles
}
