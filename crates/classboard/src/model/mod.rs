//! # Domain Model
//!
//! The three record families managed by the dashboard stores. They share one
//! structural pattern: **identity + mutable fields + derived display fields**.
//!
//! | Record | Identity | Store key |
//! |--------|----------|-----------|
//! | [`TaskRecord`] | `id` | `classboard.tasks` |
//! | [`RegisteredExam`] | `id` | `classboard.exams` |
//! | [`StudentExamResult`] | `(exam_id, student_id)` | `classboard.exam-results` |
//!
//! ## Invariants
//!
//! - **Task**: `status == Done` implies `progress == 100`; `progress` stays within `0..=100`.
//! - **Exam**: `total_questions == questions.len()`; question ids are exactly `1..=N`
//!   in order, assigned on create/update and never taken from input.
//! - **Result**: at most one result per compound key. Locking touches only
//!   `locked` and `updated_at`.
//!
//! ## Updates
//!
//! Records are never mutated once stored. Every change builds a new value
//! (`with_progress`, `completed`, `with_status`, `with_locked`) and the store swaps
//! it into a new collection.
//!
//! Cross-references (a result's `exam_id`) are plain ids resolved by the reader.

pub mod exam;
pub mod result;
pub mod task;

pub use exam::{
    create_registered_exam, ExamDraft, ExamQuestion, ExamStatus, QuestionDraft, QuestionType,
    RegisteredExam, TOTAL_SCORE,
};
pub use result::StudentExamResult;
pub use task::{
    create_task_record, create_task_record_on, StatusVariant, TaskAttachment, TaskDraft,
    TaskPriority, TaskRecord, TaskStatus,
};
