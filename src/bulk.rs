//! Batch input: rebuild sessions from a CSV of recorded questionnaire runs.
//!
//! One row per respondent: a label, age, gender, then one answer letter
//! (y/m/n) per question in master order. No header row.

use std::io::Read;

use chrono::Utc;

use crate::error::Error;
use crate::norms::Gender;
use crate::session::{ClientInfo, TestSession};
use crate::QUESTIONS;

/// Read recorded sessions from CSV. Each item is the row label plus a
/// session ready for scoring; rows that fail to parse yield an error
/// without stopping the iteration.
pub fn read_bulk<R: Read>(reader: R) -> impl Iterator<Item = Result<(String, TestSession), Error>> {
    let csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    csv_reader.into_records().map(|record| {
        let record = record?;
        parse_row(&record)
    })
}

fn parse_row(record: &csv::StringRecord) -> Result<(String, TestSession), Error> {
    let questions = QUESTIONS.questions();
    let expected = 3 + questions.len();
    if record.len() != expected {
        return Err(Error::MalformedRow(format!(
            "expected {expected} fields, found {}",
            record.len()
        )));
    }

    let label = record[0].to_string();
    let age: u32 = record[1]
        .parse()
        .map_err(|_| Error::MalformedRow(format!("invalid age '{}'", &record[1])))?;
    let gender: Gender = record[2].parse()?;

    let mut session = TestSession::new();
    session.begin_at(
        ClientInfo {
            name: label.clone(),
            phone: String::new(),
            email: String::new(),
            city: String::new(),
            age,
            gender,
        },
        Utc::now(),
    );
    for (question, field) in questions.iter().zip(record.iter().skip(3)) {
        session.set_answer(question.id, field.parse()?);
    }
    Ok((label, session))
}
