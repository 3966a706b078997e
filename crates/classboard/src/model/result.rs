use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::record::{flag, non_blank, number, text, text_or_number, Record};
use crate::seed;

/// One student's answers and score for one exam.
///
/// Addressed by the compound key `(exam_id, student_id)`; there is no separate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentExamResult {
    pub exam_id: String,
    pub student_id: String,
    /// Answer text by 1-based question number.
    pub answers: BTreeMap<u32, String>,
    pub score: u32,
    /// Finalized results are locked; only an explicit unlock reopens them.
    pub locked: bool,
    pub updated_at: DateTime<Utc>,
}

impl StudentExamResult {
    pub fn new(
        exam_id: impl Into<String>,
        student_id: impl Into<String>,
        answers: BTreeMap<u32, String>,
        score: u32,
    ) -> Self {
        Self {
            exam_id: exam_id.into(),
            student_id: student_id.into(),
            answers,
            score,
            locked: false,
            updated_at: Utc::now(),
        }
    }

    pub fn matches(&self, exam_id: &str, student_id: &str) -> bool {
        self.exam_id == exam_id && self.student_id == student_id
    }

    pub fn passed(&self, pass_score: u32) -> bool {
        self.score >= pass_score
    }

    /// Number of questions with a non-blank answer.
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| !a.trim().is_empty()).count()
    }

    /// A copy with only `locked` and `updated_at` changed.
    pub fn with_locked(&self, locked: bool) -> Self {
        Self {
            locked,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

/// Loose persisted form of [`StudentExamResult`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultShape {
    exam_id: Option<Value>,
    student_id: Option<Value>,
    answers: Option<Value>,
    score: Option<Value>,
    locked: Option<Value>,
    updated_at: Option<Value>,
}

fn normalize_answers(raw: Option<Value>) -> BTreeMap<u32, String> {
    let Some(Value::Object(map)) = raw else {
        return BTreeMap::new();
    };
    map.into_iter()
        .filter_map(|(question, value)| {
            let question: u32 = question.trim().parse().ok().filter(|n| *n > 0)?;
            Some((question, text_or_number(Some(value))?))
        })
        .collect()
}

impl Record for StudentExamResult {
    type Shape = ResultShape;

    const STORAGE_KEY: &'static str = "classboard.exam-results";
    const KIND: &'static str = "exam_result";

    fn seed() -> Vec<Self> {
        seed::exam_results()
    }

    fn normalize(shape: ResultShape) -> Option<Self> {
        let exam_id = non_blank(text_or_number(shape.exam_id))?;
        let student_id = non_blank(text_or_number(shape.student_id))?;

        let updated_at = text(shape.updated_at)
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Some(StudentExamResult {
            exam_id,
            student_id,
            answers: normalize_answers(shape.answers),
            score: number(shape.score)
                .map(|s| s.round().max(0.0) as u32)
                .unwrap_or(0),
            locked: flag(shape.locked).unwrap_or(false),
            updated_at,
        })
    }

    fn is_loadable(&self) -> bool {
        !self.exam_id.trim().is_empty() && !self.student_id.trim().is_empty()
    }

    fn identity(&self) -> String {
        // Unit separator cannot appear in ids produced by `derive_id`.
        format!("{}\u{1f}{}", self.exam_id, self.student_id)
    }
}
