use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::derive_id;
use crate::record::{
    items, non_blank, number, parse_date, parse_enum, text, text_or_number, Record,
};
use crate::seed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    #[default]
    Normal,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    InProgress,
    Done,
}

/// Badge styling derived from [`TaskStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusVariant {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttachment {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub assignee_name: String,
    pub assigner_name: String,
    pub priority: TaskPriority,
    pub issued_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<NaiveDate>,
    pub status: TaskStatus,
    /// Percent complete, always within `0..=100`. `100` whenever status is `Done`.
    pub progress: u8,
    pub description: String,
    pub attachments: Vec<TaskAttachment>,
}

impl TaskRecord {
    pub fn status_variant(&self) -> StatusVariant {
        match self.status {
            TaskStatus::InProgress => StatusVariant::Info,
            TaskStatus::Done => StatusVariant::Success,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self.status {
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn priority_label(&self) -> &'static str {
        match self.priority {
            TaskPriority::High => "High",
            TaskPriority::Normal => "Normal",
            TaskPriority::Low => "Low",
        }
    }

    /// Open tasks whose due date has passed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due_at.is_some_and(|due| due < today)
    }

    /// A copy with progress set (clamped to `0..=100`).
    ///
    /// Reaching 100 completes the task; dropping below 100 reopens a done task.
    pub fn with_progress(&self, progress: i32) -> Self {
        let progress = progress.clamp(0, 100) as u8;
        let status = if progress == 100 {
            TaskStatus::Done
        } else {
            TaskStatus::InProgress
        };
        Self {
            progress,
            status,
            ..self.clone()
        }
    }

    /// Restore the progress/status invariant after an arbitrary edit.
    pub(crate) fn with_invariants(mut self) -> Self {
        self.progress = self.progress.min(100);
        if self.status == TaskStatus::Done {
            self.progress = 100;
        }
        self
    }

    /// A copy marked done with full progress.
    pub fn completed(&self) -> Self {
        Self {
            status: TaskStatus::Done,
            progress: 100,
            ..self.clone()
        }
    }
}

/// User-submitted input for a new task.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub subtitle: String,
    pub assignee_name: String,
    pub assigner_name: String,
    pub priority: TaskPriority,
    pub due_at: Option<NaiveDate>,
    pub description: String,
    pub attachments: Vec<TaskAttachment>,
}

/// Build a fresh, in-progress task from a draft, issued today.
pub fn create_task_record(draft: TaskDraft) -> TaskRecord {
    create_task_record_on(draft, Utc::now().date_naive())
}

/// Build a fresh, in-progress task from a draft with an explicit issue date.
pub fn create_task_record_on(draft: TaskDraft, issued_at: NaiveDate) -> TaskRecord {
    let title = draft.title.trim().to_string();
    let assignee_name = draft.assignee_name.trim().to_string();
    TaskRecord {
        id: derive_id(&["task", title.as_str(), assignee_name.as_str()]),
        title,
        subtitle: draft.subtitle.trim().to_string(),
        assignee_name,
        assigner_name: draft.assigner_name.trim().to_string(),
        priority: draft.priority,
        issued_at,
        due_at: draft.due_at,
        status: TaskStatus::InProgress,
        progress: 0,
        description: draft.description,
        attachments: draft.attachments,
    }
}

/// Loose persisted form of [`TaskRecord`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskShape {
    id: Option<Value>,
    title: Option<Value>,
    subtitle: Option<Value>,
    assignee_name: Option<Value>,
    assigner_name: Option<Value>,
    priority: Option<Value>,
    issued_at: Option<Value>,
    due_at: Option<Value>,
    status: Option<Value>,
    progress: Option<Value>,
    description: Option<Value>,
    attachments: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AttachmentShape {
    name: Option<Value>,
    size_label: Option<Value>,
}

fn attachment(item: Value) -> Option<TaskAttachment> {
    let shape: AttachmentShape = serde_json::from_value(item).ok()?;
    Some(TaskAttachment {
        name: non_blank(text(shape.name))?,
        size_label: text(shape.size_label),
    })
}

impl Record for TaskRecord {
    type Shape = TaskShape;

    const STORAGE_KEY: &'static str = "classboard.tasks";
    const KIND: &'static str = "task";

    fn seed() -> Vec<Self> {
        seed::tasks()
    }

    fn normalize(shape: TaskShape) -> Option<Self> {
        let title = non_blank(text(shape.title))?;
        let assignee_name = non_blank(text(shape.assignee_name))?;

        let status: TaskStatus = parse_enum(text(shape.status).as_deref()).unwrap_or_default();
        let progress = match status {
            TaskStatus::Done => 100,
            TaskStatus::InProgress => number(shape.progress)
                .map(|p| p.round().clamp(0.0, 100.0) as u8)
                .unwrap_or(0),
        };

        let id = non_blank(text_or_number(shape.id))
            .unwrap_or_else(|| derive_id(&["task", title.as_str(), assignee_name.as_str()]));

        Some(TaskRecord {
            id,
            title,
            subtitle: text(shape.subtitle).unwrap_or_default(),
            assignee_name,
            assigner_name: text(shape.assigner_name).unwrap_or_default(),
            priority: parse_enum(text(shape.priority).as_deref()).unwrap_or_default(),
            issued_at: parse_date(text(shape.issued_at).as_deref())
                .unwrap_or_else(|| Utc::now().date_naive()),
            due_at: parse_date(text(shape.due_at).as_deref()),
            status,
            progress,
            description: text(shape.description).unwrap_or_default(),
            attachments: items(shape.attachments)
                .into_iter()
                .filter_map(attachment)
                .collect(),
        })
    }

    fn is_loadable(&self) -> bool {
        !self.title.trim().is_empty() && !self.assignee_name.trim().is_empty()
    }

    fn identity(&self) -> String {
        self.id.clone()
    }
}
