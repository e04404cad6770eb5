//! Test session: accumulates client info and answers, and assembles the
//! final result once the questionnaire is complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::norms::{Gender, NormTables};
use crate::scoring::{
    calculate_percentiles, calculate_raw_scores, Answer, AnswerValue, Percentiles, RawScores,
};
use crate::{CONTROL_QUESTION_FIRST, CONTROL_QUESTION_SECOND, TOTAL_QUESTIONS};

/// Demographics captured once before testing begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
}

/// The finalized record for one completed questionnaire. Created exactly
/// once per session and never mutated; persistence and notification
/// collaborators consume it as-is. Serializes camelCase with ISO timestamps
/// to match the stored-result shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: Uuid,
    pub client_info: ClientInfo,
    pub answers: Vec<Answer>,
    pub raw_scores: RawScores,
    pub percentiles: Percentiles,
    pub question22_answer: AnswerValue,
    pub question197_answer: AnswerValue,
    pub maybe_count: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub created_at: DateTime<Utc>,
}

impl TestResult {
    /// Plain-text summary for out-of-band delivery: client identity, the
    /// ten percentiles, duration, and the "maybe" count.
    pub fn summary(&self) -> String {
        let info = &self.client_info;
        let city = if info.city.is_empty() { "-" } else { &info.city };
        format!(
            "New OCA test result\n\n\
             Client: {}\n\
             Phone: {}\n\
             Email: {}\n\
             City: {}\n\
             Age: {}\n\
             Gender: {}\n\n\
             Scores: {}\n\n\
             Duration: {} min\n\
             \"Maybe\" answers: {}",
            info.name,
            info.phone,
            info.email,
            city,
            info.age,
            info.gender,
            self.percentiles.summary_line(),
            self.duration_minutes,
            self.maybe_count,
        )
    }
}

/// One questionnaire run: an explicit state object rather than ambient
/// storage, so scoring stays a pure function of the session snapshot.
#[derive(Debug, Clone, Default)]
pub struct TestSession {
    client_info: Option<ClientInfo>,
    answers: Vec<Answer>,
    start_time: Option<DateTime<Utc>>,
}

impl TestSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the client and stamp the start of the run.
    pub fn begin(&mut self, info: ClientInfo) {
        self.begin_at(info, Utc::now());
    }

    pub fn begin_at(&mut self, info: ClientInfo, start_time: DateTime<Utc>) {
        self.client_info = Some(info);
        self.start_time = Some(start_time);
    }

    /// Record an answer, replacing any earlier answer to the same question.
    pub fn set_answer(&mut self, question_id: u32, answer: AnswerValue) {
        let answer = Answer {
            question_id,
            answer,
        };
        match self
            .answers
            .iter_mut()
            .find(|existing| existing.question_id == question_id)
        {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
    }

    pub fn answer(&self, question_id: u32) -> Option<AnswerValue> {
        self.answers
            .iter()
            .find(|answer| answer.question_id == question_id)
            .map(|answer| answer.answer)
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn client_info(&self) -> Option<&ClientInfo> {
        self.client_info.as_ref()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// A session is complete once every question has an answer; any of
    /// yes/maybe/no counts as answered.
    pub fn is_complete(&self) -> bool {
        self.answers.len() == TOTAL_QUESTIONS
    }

    /// Raw per-scale totals over the answers recorded so far.
    pub fn raw_scores(&self) -> RawScores {
        calculate_raw_scores(&self.answers)
    }

    /// Percentiles over the answers recorded so far. `None` until client
    /// info is set, since norms are demographic.
    pub fn percentiles(&self, norms: &NormTables) -> Option<Percentiles> {
        let info = self.client_info.as_ref()?;
        Some(calculate_percentiles(
            &self.raw_scores(),
            info.gender,
            info.age,
            norms,
        ))
    }

    /// Assemble the final result with the current time as the end of the run.
    pub fn result(&self, norms: &NormTables) -> Option<TestResult> {
        self.result_at(norms, Utc::now())
    }

    /// Assemble the final result.
    ///
    /// Returns `None` when a precondition does not hold: client info unset,
    /// fewer than the full set of answers, or no recorded start time. These
    /// are "not ready" states for the caller to check, not errors.
    pub fn result_at(&self, norms: &NormTables, end_time: DateTime<Utc>) -> Option<TestResult> {
        let info = self.client_info.as_ref()?;
        if !self.is_complete() {
            return None;
        }
        let start_time = self.start_time?;

        let raw_scores = self.raw_scores();
        let percentiles = calculate_percentiles(&raw_scores, info.gender, info.age, norms);

        // Control questions default to "maybe" when unanswered.
        let question22_answer = self
            .answer(CONTROL_QUESTION_FIRST)
            .unwrap_or(AnswerValue::Maybe);
        let question197_answer = self
            .answer(CONTROL_QUESTION_SECOND)
            .unwrap_or(AnswerValue::Maybe);
        let maybe_count = self
            .answers
            .iter()
            .filter(|answer| answer.answer == AnswerValue::Maybe)
            .count() as u32;

        let duration_ms = (end_time - start_time).num_milliseconds();
        let duration_minutes = (duration_ms as f64 / 60_000.0).round() as i64;

        Some(TestResult {
            id: Uuid::new_v4(),
            client_info: info.clone(),
            answers: self.answers.clone(),
            raw_scores,
            percentiles,
            question22_answer,
            question197_answer,
            maybe_count,
            start_time,
            end_time,
            duration_minutes,
            created_at: end_time,
        })
    }

    /// Fill every question with the value chosen by `choose`, keeping
    /// existing answers only where `choose` overwrites them. Intended for
    /// tests and batch tooling.
    pub fn fill_with(&mut self, mut choose: impl FnMut(u32) -> AnswerValue) {
        for question in crate::QUESTIONS.questions() {
            self.set_answer(question.id, choose(question.id));
        }
    }

    /// Discard all recorded state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;
    use crate::scoring::Scale;

    fn client(age: u32, gender: Gender) -> ClientInfo {
        ClientInfo {
            name: "Test Client".into(),
            phone: "+1 555 0100".into(),
            email: "client@example.com".into(),
            city: "Springfield".into(),
            age,
            gender,
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
    }

    fn completed_session(choose: impl FnMut(u32) -> AnswerValue) -> TestSession {
        let mut session = TestSession::new();
        session.begin_at(client(30, Gender::Female), start());
        session.fill_with(choose);
        session
    }

    #[test]
    fn test_complete_session_yields_result() {
        let session = completed_session(|_| AnswerValue::Yes);
        assert!(session.is_complete());
        assert!(session.result(&NormTables::reference()).is_some());
    }

    #[test]
    fn test_result_requires_client_info() {
        let mut session = TestSession::new();
        session.fill_with(|_| AnswerValue::Yes);
        assert!(session.result(&NormTables::reference()).is_none());
        assert!(session.percentiles(&NormTables::reference()).is_none());
    }

    #[test]
    fn test_result_requires_all_answers() {
        let mut session = TestSession::new();
        session.begin_at(client(30, Gender::Female), start());
        for id in 1..=199 {
            session.set_answer(id, AnswerValue::No);
        }
        assert!(!session.is_complete());
        assert!(session.result(&NormTables::reference()).is_none());
    }

    #[test]
    fn test_set_answer_replaces_earlier_answer() {
        let mut session = TestSession::new();
        session.set_answer(5, AnswerValue::Yes);
        session.set_answer(5, AnswerValue::No);
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.answer(5), Some(AnswerValue::No));
    }

    #[test]
    fn test_all_yes_end_to_end_percentiles() {
        let session = completed_session(|_| AnswerValue::Yes);
        let result = session
            .result_at(&NormTables::reference(), start())
            .unwrap();
        for scale in Scale::ALL {
            assert_eq!(result.raw_scores[scale], 8, "scale {scale} raw");
            assert_eq!(result.percentiles[scale], 40, "scale {scale} percentile");
        }
        assert_eq!(result.maybe_count, 0);
        assert_eq!(result.question22_answer, AnswerValue::Yes);
        assert_eq!(result.question197_answer, AnswerValue::Yes);
    }

    #[test]
    fn test_maybe_count() {
        // Exactly 40 "maybe" answers: ids 1..=40.
        let session = completed_session(|id| {
            if id <= 40 {
                AnswerValue::Maybe
            } else {
                AnswerValue::No
            }
        });
        let result = session.result(&NormTables::reference()).unwrap();
        assert_eq!(result.maybe_count, 40);
    }

    #[test]
    fn test_control_question_defaults_to_maybe() {
        // 200 answers, but question 22 never answered: ids shifted by one
        // past it. Id 201 has no key and scores nothing, yet still counts
        // toward completion.
        let mut session = TestSession::new();
        session.begin_at(client(30, Gender::Female), start());
        for id in 1..=201 {
            if id != 22 {
                session.set_answer(id, AnswerValue::Yes);
            }
        }
        let result = session.result(&NormTables::reference()).unwrap();
        assert_eq!(result.question22_answer, AnswerValue::Maybe);
        assert_eq!(result.question197_answer, AnswerValue::Yes);
    }

    #[test]
    fn test_duration_rounds_to_whole_minutes() {
        let session = completed_session(|_| AnswerValue::No);
        let end = start() + chrono::Duration::seconds(150);
        let result = session.result_at(&NormTables::reference(), end).unwrap();
        assert_eq!(result.duration_minutes, 3);

        let end = start() + chrono::Duration::seconds(89);
        let result = session.result_at(&NormTables::reference(), end).unwrap();
        assert_eq!(result.duration_minutes, 1);
    }

    #[test]
    fn test_result_serializes_to_stored_shape() {
        let session = completed_session(|_| AnswerValue::Maybe);
        let end = start() + chrono::Duration::minutes(12);
        let result = session.result_at(&NormTables::reference(), end).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["clientInfo"]["age"], 30);
        assert_eq!(json["clientInfo"]["gender"], "female");
        assert_eq!(json["rawScores"]["A"], 0);
        assert_eq!(json["percentiles"]["J"], 0);
        assert_eq!(json["question22Answer"], "maybe");
        assert_eq!(json["question197Answer"], "maybe");
        assert_eq!(json["maybeCount"], 200);
        assert_eq!(json["durationMinutes"], 12);
        assert_eq!(json["answers"].as_array().unwrap().len(), 200);
        assert!(json["startTime"].as_str().unwrap().starts_with("2026-03-14T09:00:00"));
    }

    #[test]
    fn test_summary_lists_identity_and_scores() {
        let session = completed_session(|_| AnswerValue::Yes);
        let end = start() + chrono::Duration::minutes(25);
        let result = session.result_at(&NormTables::reference(), end).unwrap();
        let summary = result.summary();

        assert!(summary.contains("Client: Test Client"));
        assert!(summary.contains("Age: 30"));
        assert!(summary.contains("Gender: female"));
        assert!(summary.contains("A: +40"));
        assert!(summary.contains("Duration: 25 min"));
        assert!(summary.contains("\"Maybe\" answers: 0"));
    }

    #[test]
    fn test_summary_blank_city_renders_dash() {
        let mut info = client(40, Gender::Male);
        info.city = String::new();
        let mut session = TestSession::new();
        session.begin_at(info, start());
        session.fill_with(|_| AnswerValue::No);
        let summary = session.result(&NormTables::reference()).unwrap().summary();
        assert!(summary.contains("City: -"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = completed_session(|_| AnswerValue::Yes);
        session.reset();
        assert_eq!(session.answered_count(), 0);
        assert!(session.client_info().is_none());
        assert!(session.result(&NormTables::reference()).is_none());
    }
}
