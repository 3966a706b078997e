use super::engine::{Snapshot, Store};
use crate::model::exam::exam_from_draft;
use crate::model::{create_registered_exam, ExamDraft, ExamStatus, RegisteredExam};
use crate::record::Record;
use crate::storage::StorageBackend;
use log::debug;
use std::rc::Rc;

pub type ExamStore<B> = Store<RegisteredExam, B>;

impl<B: StorageBackend> Store<RegisteredExam, B> {
    /// Register a new exam from a draft and return its id.
    ///
    /// A draft with a blank title or subject is refused and nothing changes.
    pub fn register_exam(&self, draft: ExamDraft) -> Option<String> {
        let exam = create_registered_exam(draft);
        if !exam.is_loadable() {
            debug!(
                "event=exam_register status=rejected title={:?} subject={:?}",
                exam.title, exam.subject
            );
            return None;
        }
        let id = exam.id.clone();
        self.mutate(|current| {
            Rc::new(
                std::iter::once(exam)
                    .chain(current.iter().cloned())
                    .collect(),
            )
        });
        Some(id)
    }

    /// Rebuild an exam from a draft, keeping its id.
    ///
    /// Questions are renumbered. Status and date are kept when the draft leaves them unset.
    /// A draft with a blank title or subject leaves the exam unchanged.
    pub fn update_exam(&self, id: &str, draft: ExamDraft) -> Snapshot<RegisteredExam> {
        self.update_where(
            |e| e.id == id,
            |existing| {
                let draft = ExamDraft {
                    status: draft.status.or(Some(existing.status)),
                    exam_date: draft.exam_date.or(Some(existing.exam_date)),
                    ..draft
                };
                exam_from_draft(existing.id.clone(), draft)
            },
        )
    }

    pub fn set_exam_status(&self, id: &str, status: ExamStatus) -> Snapshot<RegisteredExam> {
        self.update_where(|e| e.id == id, |e| e.with_status(status))
    }

    /// Remove an exam. Results referencing it are left to the results store.
    pub fn remove_exam(&self, id: &str) -> Snapshot<RegisteredExam> {
        self.remove_where(|e| e.id == id)
    }

    pub fn find_exam(&self, id: &str) -> Option<RegisteredExam> {
        self.select(|exams| exams.iter().find(|e| e.id == id).cloned())
    }

    pub fn exams_for_class(&self, class_id: &str) -> Vec<RegisteredExam> {
        self.select(|exams| {
            exams
                .iter()
                .filter(|e| e.class_id == class_id)
                .cloned()
                .collect()
        })
    }
}
