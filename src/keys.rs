//! Question key table: the static mapping from question id to the scale it
//! scores into and the three answer weights.
//!
//! The shipped table is reference weighting data, not calibration output:
//! scales rotate over question ids (id 1 scores into A, 2 into B, .., 11 back
//! into A), giving each scale twenty questions, and weights follow a fixed
//! five-question cycle whose yes-weights sum to +8 and no-weights to -8 per
//! scale. Calibrated weights would replace this table wholesale; nothing else
//! in the crate depends on how it was produced.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::scoring::{AnswerValue, Scale};
use crate::TOTAL_QUESTIONS;

/// Scale assignment and answer weights for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionKey {
    pub question_id: u32,
    pub scale: Scale,
    pub weight_no: i32,
    pub weight_maybe: i32,
    pub weight_yes: i32,
}

impl QuestionKey {
    /// The weight contributed by the given answer value.
    pub fn weight(&self, answer: AnswerValue) -> i32 {
        match answer {
            AnswerValue::Yes => self.weight_yes,
            AnswerValue::Maybe => self.weight_maybe,
            AnswerValue::No => self.weight_no,
        }
    }
}

const YES_WEIGHTS: [i32; 5] = [2, 1, -1, 0, 0];
const MAYBE_WEIGHTS: [i32; 5] = [1, 0, -1, 0, 0];
const NO_WEIGHTS: [i32; 5] = [-2, -1, 1, 0, 0];

static KEYS: Lazy<HashMap<u32, QuestionKey>> = Lazy::new(|| {
    (1..=TOTAL_QUESTIONS as u32)
        .map(|id| {
            let scale = Scale::ALL[((id - 1) % 10) as usize];
            let slot = ((id - 1) / 10 % 5) as usize;
            let key = QuestionKey {
                question_id: id,
                scale,
                weight_no: NO_WEIGHTS[slot],
                weight_maybe: MAYBE_WEIGHTS[slot],
                weight_yes: YES_WEIGHTS[slot],
            };
            (id, key)
        })
        .collect()
});

/// Look up the key for a question id. Unknown ids return `None`; callers
/// treat that as "contributes nothing" rather than a fatal error.
pub fn get_question_key(question_id: u32) -> Option<&'static QuestionKey> {
    KEYS.get(&question_id)
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;
    use crate::QUESTIONS;

    #[test]
    fn test_every_question_has_exactly_one_key() {
        for question in QUESTIONS.questions() {
            assert!(
                get_question_key(question.id).is_some(),
                "question {} has no key",
                question.id
            );
        }
        assert_eq!(KEYS.len(), TOTAL_QUESTIONS);
    }

    #[test]
    fn test_unknown_ids_are_tolerated() {
        assert!(get_question_key(0).is_none());
        assert!(get_question_key(201).is_none());
        assert!(get_question_key(u32::MAX).is_none());
    }

    #[test]
    fn test_keys_cover_all_ten_scales() {
        let scales: HashSet<Scale> = KEYS.values().map(|key| key.scale).collect();
        assert_eq!(scales.len(), Scale::ALL.len());
    }

    #[test]
    fn test_reference_weights_sum_per_scale() {
        for scale in Scale::ALL {
            let keys: Vec<_> = KEYS.values().filter(|key| key.scale == scale).collect();
            assert_eq!(keys.len(), 20, "scale {scale} question count");
            assert_eq!(
                keys.iter().map(|key| key.weight_yes).sum::<i32>(),
                8,
                "scale {scale} yes-weight sum"
            );
            assert_eq!(
                keys.iter().map(|key| key.weight_no).sum::<i32>(),
                -8,
                "scale {scale} no-weight sum"
            );
            assert_eq!(
                keys.iter().map(|key| key.weight_maybe).sum::<i32>(),
                0,
                "scale {scale} maybe-weight sum"
            );
        }
    }

    #[test]
    fn test_weight_selection_follows_answer_value() {
        let key = QuestionKey {
            question_id: 1,
            scale: Scale::A,
            weight_no: -2,
            weight_maybe: 1,
            weight_yes: 2,
        };
        assert_eq!(key.weight(AnswerValue::Yes), 2);
        assert_eq!(key.weight(AnswerValue::Maybe), 1);
        assert_eq!(key.weight(AnswerValue::No), -2);
    }
}
