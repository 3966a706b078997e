//! # Seed Provider
//!
//! Static sample collections used for the server-render snapshot and as the
//! fallback when nothing valid is persisted. Built once, handed out as clones,
//! so callers can never alter the shared copy.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::model::{
    ExamQuestion, ExamStatus, QuestionType, RegisteredExam, StudentExamResult, TaskAttachment,
    TaskPriority, TaskRecord, TaskStatus, TOTAL_SCORE,
};

static TASKS: Lazy<Vec<TaskRecord>> = Lazy::new(build_tasks);
static EXAMS: Lazy<Vec<RegisteredExam>> = Lazy::new(build_exams);
static EXAM_RESULTS: Lazy<Vec<StudentExamResult>> = Lazy::new(build_exam_results);

pub fn tasks() -> Vec<TaskRecord> {
    TASKS.clone()
}

pub fn exams() -> Vec<RegisteredExam> {
    EXAMS.clone()
}

pub fn exam_results() -> Vec<StudentExamResult> {
    EXAM_RESULTS.clone()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    subtitle: &str,
    assignee: &str,
    priority: TaskPriority,
    issued_at: NaiveDate,
    due_at: Option<NaiveDate>,
    progress: u8,
    description: &str,
) -> TaskRecord {
    let status = if progress == 100 {
        TaskStatus::Done
    } else {
        TaskStatus::InProgress
    };
    TaskRecord {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        assignee_name: assignee.to_string(),
        assigner_name: "Principal Park".to_string(),
        priority,
        issued_at,
        due_at,
        status,
        progress,
        description: description.to_string(),
        attachments: Vec::new(),
    }
}

fn build_tasks() -> Vec<TaskRecord> {
    vec![
        TaskRecord {
            attachments: vec![TaskAttachment {
                name: "midterm-rubric.pdf".to_string(),
                size_label: Some("240 KB".to_string()),
            }],
            ..task(
                "task-grade-midterms-3a",
                "Grade midterms",
                "Class 3-A mathematics",
                "Kim Jiwoo",
                TaskPriority::High,
                date(2025, 4, 21),
                Some(date(2025, 4, 28)),
                40,
                "Score the written section and enter results before the retest list is drawn up.",
            )
        },
        task(
            "task-retest-schedule-2b",
            "Schedule retests",
            "Class 2-B science",
            "Lee Minho",
            TaskPriority::Normal,
            date(2025, 4, 18),
            Some(date(2025, 5, 2)),
            10,
            "Book a room and a proctor for students below the pass score.",
        ),
        task(
            "task-roster-update-1c",
            "Update class roster",
            "Class 1-C homeroom",
            "Choi Yuna",
            TaskPriority::Low,
            date(2025, 4, 10),
            None,
            100,
            "Add the two transfer students and archive last term's withdrawals.",
        ),
        task(
            "task-parent-notices-3a",
            "Send parent notices",
            "Class 3-A",
            "Kim Jiwoo",
            TaskPriority::Normal,
            date(2025, 4, 22),
            Some(date(2025, 4, 25)),
            0,
            "Notify parents of the retest date and the material covered.",
        ),
    ]
}

fn question(id: u32, label: &str, kind: QuestionType, points: u32, answer: &str) -> ExamQuestion {
    ExamQuestion {
        id,
        label: label.to_string(),
        kind,
        points,
        answer: answer.to_string(),
    }
}

fn build_exams() -> Vec<RegisteredExam> {
    let math_questions = vec![
        question(1, "Solve 3x + 5 = 20", QuestionType::MultipleChoice, 25, "B"),
        question(2, "Factor x^2 - 9", QuestionType::MultipleChoice, 25, "D"),
        question(3, "Slope through (1,2) and (3,8)", QuestionType::MultipleChoice, 20, "A"),
        question(4, "Explain why a quadratic has at most two roots", QuestionType::FreeResponse, 30, ""),
    ];
    let science_questions = vec![
        question(1, "Unit of force", QuestionType::MultipleChoice, 30, "C"),
        question(2, "Boiling point of water at sea level", QuestionType::MultipleChoice, 30, "A"),
        question(3, "Describe the water cycle", QuestionType::FreeResponse, 40, ""),
    ];
    let english_questions = vec![
        question(1, "Choose the correct past participle", QuestionType::MultipleChoice, 50, "B"),
        question(2, "Summarize the passage", QuestionType::FreeResponse, 50, ""),
    ];

    vec![
        RegisteredExam {
            id: "exam-math-midterm-3a".to_string(),
            title: "Spring midterm".to_string(),
            subject: "Mathematics".to_string(),
            class_id: "class-3a".to_string(),
            target_class: "3-A".to_string(),
            exam_date: date(2025, 4, 15),
            total_questions: math_questions.len() as u32,
            total_score: TOTAL_SCORE,
            pass_score: 60,
            status: ExamStatus::Grading,
            summary: "Linear equations, factoring, and slope.".to_string(),
            notes: vec!["Calculators not permitted.".to_string()],
            questions: math_questions,
        },
        RegisteredExam {
            id: "exam-science-quiz-2b".to_string(),
            title: "Unit 4 quiz".to_string(),
            subject: "Science".to_string(),
            class_id: "class-2b".to_string(),
            target_class: "2-B".to_string(),
            exam_date: date(2025, 4, 11),
            total_questions: science_questions.len() as u32,
            total_score: TOTAL_SCORE,
            pass_score: 70,
            status: ExamStatus::Published,
            summary: "Forces and states of matter.".to_string(),
            notes: Vec::new(),
            questions: science_questions,
        },
        RegisteredExam {
            id: "exam-english-retest-3a".to_string(),
            title: "Grammar retest".to_string(),
            subject: "English".to_string(),
            class_id: "class-3a".to_string(),
            target_class: "3-A".to_string(),
            exam_date: date(2025, 5, 2),
            total_questions: english_questions.len() as u32,
            total_score: TOTAL_SCORE,
            pass_score: 60,
            status: ExamStatus::Draft,
            summary: "Retest for students below 60 on the March assessment.".to_string(),
            notes: vec![
                "Same room as the original sitting.".to_string(),
                "Bring answer sheets from the office.".to_string(),
            ],
            questions: english_questions,
        },
    ]
}

fn answers(pairs: &[(u32, &str)]) -> BTreeMap<u32, String> {
    pairs
        .iter()
        .map(|(number, text)| (*number, text.to_string()))
        .collect()
}

fn build_exam_results() -> Vec<StudentExamResult> {
    vec![
        StudentExamResult {
            exam_id: "exam-math-midterm-3a".to_string(),
            student_id: "student-3a-01".to_string(),
            answers: answers(&[(1, "B"), (2, "D"), (3, "C"), (4, "Degree two")]),
            score: 50,
            locked: false,
            updated_at: timestamp(1_744_963_200),
        },
        StudentExamResult {
            exam_id: "exam-math-midterm-3a".to_string(),
            student_id: "student-3a-02".to_string(),
            answers: answers(&[(1, "B"), (2, "A"), (3, "A")]),
            score: 45,
            locked: false,
            updated_at: timestamp(1_744_966_800),
        },
        StudentExamResult {
            exam_id: "exam-science-quiz-2b".to_string(),
            student_id: "student-2b-07".to_string(),
            answers: answers(&[(1, "C"), (2, "A"), (3, "Evaporation then rain")]),
            score: 92,
            locked: true,
            updated_at: timestamp(1_744_621_200),
        },
        StudentExamResult {
            exam_id: "exam-science-quiz-2b".to_string(),
            student_id: "student-2b-11".to_string(),
            answers: answers(&[(1, "A"), (2, "A")]),
            score: 30,
            locked: true,
            updated_at: timestamp(1_744_624_800),
        },
    ]
}
