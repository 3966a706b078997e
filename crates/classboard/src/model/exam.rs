use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::id::derive_id;
use crate::record::{
    items, non_blank, number, parse_date, parse_enum, text, text_or_number, Record,
};
use crate::seed;

/// Every registered exam is scored out of this total.
pub const TOTAL_SCORE: u32 = 100;

const DEFAULT_PASS_SCORE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    #[default]
    Draft,
    Grading,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    FreeResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuestion {
    /// 1-based position within the exam. Assigned, never user-supplied.
    pub id: u32,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub points: u32,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredExam {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub class_id: String,
    pub target_class: String,
    pub exam_date: NaiveDate,
    /// Always equal to `questions.len()`.
    pub total_questions: u32,
    pub total_score: u32,
    pub pass_score: u32,
    pub status: ExamStatus,
    pub summary: String,
    pub notes: Vec<String>,
    pub questions: Vec<ExamQuestion>,
}

impl RegisteredExam {
    pub fn status_label(&self) -> &'static str {
        match self.status {
            ExamStatus::Draft => "Draft",
            ExamStatus::Grading => "Grading",
            ExamStatus::Published => "Published",
        }
    }

    /// Sum of question points (may differ from `total_score` on a draft).
    pub fn max_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    pub fn question(&self, number: u32) -> Option<&ExamQuestion> {
        self.questions.iter().find(|q| q.id == number)
    }

    /// Score multiple-choice answers against the key.
    ///
    /// Free-response questions need a human grader and contribute nothing.
    /// Answers are compared trimmed and case-insensitively. The result is capped
    /// at `total_score`.
    pub fn grade(&self, answers: &BTreeMap<u32, String>) -> u32 {
        let earned: u32 = self
            .questions
            .iter()
            .filter(|q| q.kind == QuestionType::MultipleChoice)
            .filter(|q| {
                answers.get(&q.id).is_some_and(|given| {
                    let given = given.trim();
                    !given.is_empty() && given.eq_ignore_ascii_case(q.answer.trim())
                })
            })
            .map(|q| q.points)
            .sum();
        earned.min(self.total_score)
    }

    pub fn with_status(&self, status: ExamStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// User-submitted question input. Any `id` given is ignored.
#[derive(Debug, Clone, Default)]
pub struct QuestionDraft {
    pub id: Option<u32>,
    pub label: String,
    pub kind: QuestionType,
    pub points: u32,
    pub answer: String,
}

/// User-submitted input for registering or editing an exam.
#[derive(Debug, Clone, Default)]
pub struct ExamDraft {
    pub title: String,
    pub subject: String,
    pub class_id: String,
    pub target_class: String,
    pub exam_date: Option<NaiveDate>,
    pub pass_score: Option<u32>,
    pub status: Option<ExamStatus>,
    pub summary: String,
    pub notes: Vec<String>,
    pub questions: Vec<QuestionDraft>,
}

fn number_questions(drafts: Vec<QuestionDraft>) -> Vec<ExamQuestion> {
    drafts
        .into_iter()
        .zip(1u32..)
        .map(|(draft, number)| ExamQuestion {
            id: number,
            label: draft.label,
            kind: draft.kind,
            points: draft.points,
            answer: draft.answer,
        })
        .collect()
}

/// Build a registered exam from a draft, deriving a new id.
pub fn create_registered_exam(draft: ExamDraft) -> RegisteredExam {
    let id = derive_id(&["exam", draft.subject.trim(), draft.title.trim()]);
    exam_from_draft(id, draft)
}

/// Build a registered exam from a draft under an existing id.
///
/// Questions are renumbered `1..=N` in input order.
pub fn exam_from_draft(id: String, draft: ExamDraft) -> RegisteredExam {
    let questions = number_questions(draft.questions);
    RegisteredExam {
        id,
        title: draft.title.trim().to_string(),
        subject: draft.subject.trim().to_string(),
        class_id: draft.class_id,
        target_class: draft.target_class,
        exam_date: draft.exam_date.unwrap_or_else(|| Utc::now().date_naive()),
        total_questions: questions.len() as u32,
        total_score: TOTAL_SCORE,
        pass_score: draft
            .pass_score
            .unwrap_or(DEFAULT_PASS_SCORE)
            .min(TOTAL_SCORE),
        status: draft.status.unwrap_or_default(),
        summary: draft.summary,
        notes: draft.notes,
        questions,
    }
}

/// Loose persisted form of [`ExamQuestion`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuestionShape {
    label: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<Value>,
    points: Option<Value>,
    answer: Option<Value>,
}

/// Loose persisted form of [`RegisteredExam`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamShape {
    id: Option<Value>,
    title: Option<Value>,
    subject: Option<Value>,
    class_id: Option<Value>,
    target_class: Option<Value>,
    exam_date: Option<Value>,
    pass_score: Option<Value>,
    status: Option<Value>,
    summary: Option<Value>,
    notes: Option<Value>,
    questions: Option<Value>,
}

fn to_points(value: Option<f64>) -> Option<u32> {
    value.map(|v| v.round().max(0.0) as u32)
}

fn question(item: Value) -> Option<QuestionDraft> {
    let q: QuestionShape = serde_json::from_value(item).ok()?;
    Some(QuestionDraft {
        id: None,
        label: text(q.label).unwrap_or_default(),
        kind: parse_enum(text(q.kind).as_deref()).unwrap_or_default(),
        points: to_points(number(q.points)).unwrap_or(0),
        answer: text_or_number(q.answer).unwrap_or_default(),
    })
}

impl Record for RegisteredExam {
    type Shape = ExamShape;

    const STORAGE_KEY: &'static str = "classboard.exams";
    const KIND: &'static str = "exam";

    fn seed() -> Vec<Self> {
        seed::exams()
    }

    fn normalize(shape: ExamShape) -> Option<Self> {
        let title = non_blank(text(shape.title))?;
        let subject = non_blank(text(shape.subject))?;

        let questions: Vec<QuestionDraft> = items(shape.questions)
            .into_iter()
            .filter_map(question)
            .collect();

        let notes = items(shape.notes)
            .into_iter()
            .filter_map(|note| text(Some(note)))
            .collect();

        let id = non_blank(text_or_number(shape.id))
            .unwrap_or_else(|| derive_id(&["exam", subject.as_str(), title.as_str()]));

        let draft = ExamDraft {
            title: title.clone(),
            subject: subject.clone(),
            class_id: text(shape.class_id).unwrap_or_default(),
            target_class: text(shape.target_class).unwrap_or_default(),
            exam_date: parse_date(text(shape.exam_date).as_deref()),
            pass_score: to_points(number(shape.pass_score)),
            status: parse_enum(text(shape.status).as_deref()),
            summary: text(shape.summary).unwrap_or_default(),
            notes,
            questions,
        };

        // Loaded text fields are kept verbatim, only drafts are trimmed.
        Some(RegisteredExam {
            title,
            subject,
            ..exam_from_draft(id, draft)
        })
    }

    fn is_loadable(&self) -> bool {
        !self.title.trim().is_empty() && !self.subject.trim().is_empty()
    }

    fn identity(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(label: &str, answer: &str, points: u32) -> QuestionDraft {
        QuestionDraft {
            id: None,
            label: label.into(),
            kind: QuestionType::MultipleChoice,
            points,
            answer: answer.into(),
        }
    }

    #[test]
    fn test_create_renumbers_questions_in_order() {
        let draft = ExamDraft {
            title: "Unit 3 Quiz".into(),
            subject: "Math".into(),
            questions: vec![
                QuestionDraft {
                    id: Some(9),
                    ..question("first", "A", 30)
                },
                QuestionDraft {
                    id: Some(2),
                    ..question("second", "B", 30)
                },
                question("third", "C", 40),
            ],
            ..Default::default()
        };

        let exam = create_registered_exam(draft);
        let ids: Vec<u32> = exam.questions.iter().map(|q| q.id).collect();
        let labels: Vec<&str> = exam.questions.iter().map(|q| q.label.as_str()).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(labels, vec!["first", "second", "third"]);
        assert_eq!(exam.total_questions, 3);
        assert_eq!(exam.total_score, TOTAL_SCORE);
        assert_eq!(exam.status, ExamStatus::Draft);
        assert!(exam.id.starts_with("exam-math-unit-3-quiz-"));
    }

    #[test]
    fn test_pass_score_is_capped() {
        let exam = create_registered_exam(ExamDraft {
            title: "T".into(),
            subject: "S".into(),
            pass_score: Some(250),
            ..Default::default()
        });
        assert_eq!(exam.pass_score, TOTAL_SCORE);
    }

    #[test]
    fn test_grade_scores_multiple_choice_only() {
        let mut free = question("essay", "", 40);
        free.kind = QuestionType::FreeResponse;
        let exam = create_registered_exam(ExamDraft {
            title: "T".into(),
            subject: "S".into(),
            questions: vec![question("q1", "A", 30), question("q2", "b", 30), free],
            ..Default::default()
        });

        let answers = BTreeMap::from([
            (1, "a ".to_string()),
            (2, "C".to_string()),
            (3, "long answer".to_string()),
        ]);
        assert_eq!(exam.grade(&answers), 30);

        let all_right = BTreeMap::from([(1, "A".to_string()), (2, "B".to_string())]);
        assert_eq!(exam.grade(&all_right), 60);
    }

    #[test]
    fn test_normalize_requires_title_and_subject() {
        let missing: ExamShape = serde_json::from_value(json!({"title": "Quiz"})).unwrap();
        assert!(RegisteredExam::normalize(missing).is_none());
    }

    #[test]
    fn test_normalize_repairs_question_numbering() {
        let shape: ExamShape = serde_json::from_value(json!({
            "id": "exam-1",
            "title": "Quiz",
            "subject": "Science",
            "totalQuestions": 7,
            "status": "published",
            "questions": [
                {"id": 4, "label": "a", "type": "free_response", "points": 50, "answer": ""},
                "garbage",
                {"id": 4, "label": "b", "points": 50, "answer": 3}
            ]
        }))
        .unwrap();

        let exam = RegisteredExam::normalize(shape).unwrap();
        assert_eq!(exam.id, "exam-1");
        assert_eq!(exam.status, ExamStatus::Published);
        assert_eq!(exam.total_questions, 2);
        assert_eq!(exam.questions[0].id, 1);
        assert_eq!(exam.questions[0].kind, QuestionType::FreeResponse);
        assert_eq!(exam.questions[1].id, 2);
        assert_eq!(exam.questions[1].answer, "3");
        assert_eq!(exam.pass_score, DEFAULT_PASS_SCORE);
    }

    #[test]
    fn test_normalize_keeps_exam_with_bad_optional_fields() {
        let shape: ExamShape = serde_json::from_value(json!({
            "id": 7,
            "title": "Quiz",
            "subject": "Science",
            "passScore": "70",
            "examDate": false,
            "notes": "one note",
            "questions": [{"label": 5, "type": 1, "points": "20", "answer": "B"}]
        }))
        .unwrap();

        let exam = RegisteredExam::normalize(shape).unwrap();
        assert_eq!(exam.id, "7");
        assert_eq!(exam.pass_score, 70);
        assert!(exam.notes.is_empty());
        assert_eq!(exam.questions.len(), 1);
        assert_eq!(exam.questions[0].label, "");
        assert_eq!(exam.questions[0].kind, QuestionType::MultipleChoice);
        assert_eq!(exam.questions[0].points, 20);
    }
}
