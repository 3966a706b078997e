use super::engine::{Snapshot, Store};
use crate::model::StudentExamResult;
use crate::storage::StorageBackend;
use chrono::Utc;
use log::debug;
use std::collections::BTreeMap;
use std::rc::Rc;

pub type ResultStore<B> = Store<StudentExamResult, B>;

impl<B: StorageBackend> Store<StudentExamResult, B> {
    /// Insert or replace the result for `(exam_id, student_id)`.
    ///
    /// A locked result is final: saving over it leaves the collection unchanged.
    /// So does a blank exam or student id.
    pub fn save_result(
        &self,
        exam_id: &str,
        student_id: &str,
        answers: BTreeMap<u32, String>,
        score: u32,
    ) -> Snapshot<StudentExamResult> {
        self.mutate(|current| {
            if exam_id.trim().is_empty() || student_id.trim().is_empty() {
                debug!(
                    "event=result_save status=rejected exam_id={:?} student_id={:?}",
                    exam_id, student_id
                );
                return Rc::clone(current);
            }
            match current.iter().position(|r| r.matches(exam_id, student_id)) {
                Some(index) if current[index].locked => {
                    debug!(
                        "event=result_save status=locked exam_id={} student_id={}",
                        exam_id, student_id
                    );
                    Rc::clone(current)
                }
                Some(index) => {
                    let mut next = current.to_vec();
                    next[index] = StudentExamResult {
                        answers,
                        score,
                        updated_at: Utc::now(),
                        ..current[index].clone()
                    };
                    Rc::new(next)
                }
                None => {
                    let mut next = current.to_vec();
                    next.push(StudentExamResult::new(exam_id, student_id, answers, score));
                    Rc::new(next)
                }
            }
        })
    }

    /// Flip the lock flag. Only `locked` and `updated_at` change.
    pub fn set_locked(
        &self,
        exam_id: &str,
        student_id: &str,
        locked: bool,
    ) -> Snapshot<StudentExamResult> {
        self.update_where(
            |r| r.matches(exam_id, student_id),
            |r| r.with_locked(locked),
        )
    }

    pub fn remove_result(&self, exam_id: &str, student_id: &str) -> Snapshot<StudentExamResult> {
        self.remove_where(|r| r.matches(exam_id, student_id))
    }

    /// Drop every result of one exam, e.g. after the exam itself is removed.
    pub fn remove_results_for_exam(&self, exam_id: &str) -> Snapshot<StudentExamResult> {
        self.remove_where(|r| r.exam_id == exam_id)
    }

    pub fn find_result(&self, exam_id: &str, student_id: &str) -> Option<StudentExamResult> {
        self.select(|results| {
            results
                .iter()
                .find(|r| r.matches(exam_id, student_id))
                .cloned()
        })
    }

    pub fn results_for_exam(&self, exam_id: &str) -> Vec<StudentExamResult> {
        self.select(|results| {
            results
                .iter()
                .filter(|r| r.exam_id == exam_id)
                .cloned()
                .collect()
        })
    }
}
