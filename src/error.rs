use thiserror::Error;

use crate::norms::{AgeBracket, Gender};
use crate::scoring::Scale;

#[derive(Debug, Error)]
pub enum Error {
    /// The answer is not one of yes / maybe / no.
    #[error("answer must be one of yes, maybe, or no")]
    IllegalAnswer,
    /// The gender is not one of male / female.
    #[error("gender must be male or female")]
    IllegalGender,
    /// A bulk input row could not be parsed.
    #[error("malformed row: {0}")]
    MalformedRow(String),
    /// A loaded norm table has a gap the reference data contract forbids.
    #[error("norm table has no entries for {gender} {bracket} scale {scale}")]
    MalformedNorms {
        gender: Gender,
        bracket: AgeBracket,
        scale: Scale,
    },
    /// A loaded norm entry maps outside the percentile range.
    #[error("norm percentile {percentile} for raw score {raw} is outside [-100, 100]")]
    PercentileOutOfRange { raw: i32, percentile: i32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
