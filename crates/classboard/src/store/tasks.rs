use super::engine::{Snapshot, Store};
use crate::model::TaskRecord;
use crate::record::Record;
use crate::storage::StorageBackend;
use std::collections::HashSet;
use std::rc::Rc;

pub type TaskStore<B> = Store<TaskRecord, B>;

impl<B: StorageBackend> Store<TaskRecord, B> {
    /// Prepend new tasks, newest first.
    ///
    /// Records whose id is already present, or with a blank title or assignee,
    /// are skipped.
    pub fn add_tasks(&self, records: Vec<TaskRecord>) -> Snapshot<TaskRecord> {
        self.mutate(|current| {
            let mut seen: HashSet<String> = current.iter().map(|t| t.id.clone()).collect();
            let fresh: Vec<TaskRecord> = records
                .into_iter()
                .filter(|t| t.is_loadable() && seen.insert(t.id.clone()))
                .map(TaskRecord::with_invariants)
                .collect();
            if fresh.is_empty() {
                return Rc::clone(current);
            }
            Rc::new(fresh.into_iter().chain(current.iter().cloned()).collect())
        })
    }

    /// Replace a task with `update(task)`. The id cannot change.
    /// An update that blanks the title or assignee is refused.
    pub fn update_task<F>(&self, id: &str, update: F) -> Snapshot<TaskRecord>
    where
        F: FnOnce(&TaskRecord) -> TaskRecord,
    {
        self.update_where(
            |t| t.id == id,
            |t| {
                TaskRecord {
                    id: t.id.clone(),
                    ..update(t)
                }
                .with_invariants()
            },
        )
    }

    /// Set progress, clamped to `0..=100`. 100 completes the task.
    pub fn set_task_progress(&self, id: &str, progress: i32) -> Snapshot<TaskRecord> {
        self.update_where(|t| t.id == id, |t| t.with_progress(progress))
    }

    pub fn mark_task_complete(&self, id: &str) -> Snapshot<TaskRecord> {
        self.update_where(|t| t.id == id, TaskRecord::completed)
    }

    pub fn remove_task(&self, id: &str) -> Snapshot<TaskRecord> {
        self.remove_where(|t| t.id == id)
    }

    pub fn find_task(&self, id: &str) -> Option<TaskRecord> {
        self.select(|tasks| tasks.iter().find(|t| t.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{create_task_record, TaskDraft, TaskPriority, TaskStatus};
    use crate::storage::MemBackend;

    fn empty_store() -> TaskStore<MemBackend> {
        Store::with_seed(MemBackend::new(), Vec::new())
    }

    fn draft(title: &str, assignee: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            assignee_name: assignee.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_tasks_prepends() {
        let store = empty_store();
        let first = create_task_record(draft("First", "Kim"));
        let second = create_task_record(draft("Second", "Lee"));

        store.add_tasks(vec![first.clone()]);
        store.add_tasks(vec![second.clone()]);

        let ids: Vec<String> = store.get_snapshot().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_add_tasks_skips_known_ids() {
        let store = empty_store();
        let record = create_task_record(draft("Only", "Kim"));
        store.add_tasks(vec![record.clone()]);
        let before = store.get_snapshot();

        let after = store.add_tasks(vec![record]);
        assert!(Rc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn test_update_task_keeps_id_and_invariants() {
        let store = empty_store();
        let record = create_task_record(draft("Plan", "Kim"));
        store.add_tasks(vec![record.clone()]);

        store.update_task(&record.id, |t| TaskRecord {
            id: "hijacked".into(),
            title: "Plan retests".into(),
            priority: TaskPriority::Low,
            status: TaskStatus::Done,
            progress: 20,
            ..t.clone()
        });

        let updated = store.find_task(&record.id).unwrap();
        assert_eq!(updated.title, "Plan retests");
        assert_eq!(updated.priority, TaskPriority::Low);
        assert_eq!(updated.progress, 100);
        assert!(store.find_task("hijacked").is_none());
    }

    #[test]
    fn test_blank_required_fields_are_refused() {
        let store = empty_store();
        let after = store.add_tasks(vec![
            create_task_record(draft("  ", "Kim")),
            create_task_record(draft("Plan", "")),
        ]);
        assert!(after.is_empty());

        let record = create_task_record(draft("Plan", "Kim"));
        store.add_tasks(vec![record.clone()]);
        let before = store.get_snapshot();

        let after = store.update_task(&record.id, |t| TaskRecord {
            assignee_name: " ".into(),
            ..t.clone()
        });
        assert!(Rc::ptr_eq(&before, &after));
        assert_eq!(store.find_task(&record.id).unwrap().assignee_name, "Kim");
    }

    #[test]
    fn test_set_task_progress_clamps() {
        let store = empty_store();
        let record = create_task_record(draft("Plan", "Kim"));
        store.add_tasks(vec![record.clone()]);

        store.set_task_progress(&record.id, 55);
        assert_eq!(store.find_task(&record.id).unwrap().progress, 55);

        store.set_task_progress(&record.id, 400);
        let done = store.find_task(&record.id).unwrap();
        assert_eq!(done.progress, 100);
        assert_eq!(done.status, TaskStatus::Done);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let store = Store::<TaskRecord, _>::new(MemBackend::new());
        store.initialize();
        let before = store.get_snapshot();

        assert!(Rc::ptr_eq(&before, &store.mark_task_complete("missing")));
        assert!(Rc::ptr_eq(&before, &store.set_task_progress("missing", 10)));
        assert!(Rc::ptr_eq(&before, &store.remove_task("missing")));
        assert!(Rc::ptr_eq(
            &before,
            &store.update_task("missing", |t| t.completed())
        ));
    }

    #[test]
    fn test_remove_task() {
        let store = Store::<TaskRecord, _>::new(MemBackend::new());
        let id = store.get_snapshot()[0].id.clone();
        let total = store.get_snapshot().len();

        let after = store.remove_task(&id);
        assert_eq!(after.len(), total - 1);
        assert!(store.find_task(&id).is_none());
    }
}
