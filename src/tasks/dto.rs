use serde::{Deserialize, Serialize};
use time::{format_description::FormatItem, macros::format_description, PrimitiveDateTime};
use uuid::Uuid;

use crate::error::Flash;
use crate::tasks::repo::Task;

/// Wire format for due dates, matching the form input.
pub const DUE_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn parse_due_date(raw: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(raw, DUE_DATE_FORMAT).ok()
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,
    /// `"YYYY-MM-DD HH:MM:SS"`, absent means no due date.
    pub due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskItem {
    pub id: Uuid,
    pub name: String,
    pub due_date: Option<String>,
    pub completed: bool,
    pub favorite: bool,
}

impl From<Task> for TaskItem {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            name: t.name,
            due_date: t.due_date.and_then(|d| d.format(DUE_DATE_FORMAT).ok()),
            completed: t.completed,
            favorite: t.favorite,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: TaskItem,
    pub flash: Flash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn due_date_parses_form_format() {
        let parsed = parse_due_date("2024-05-29 18:30:00").expect("should parse");
        assert_eq!(parsed, datetime!(2024-05-29 18:30:00));
    }

    #[test]
    fn due_date_rejects_garbage() {
        assert!(parse_due_date("tomorrow-ish").is_none());
        assert!(parse_due_date("2024-05-29").is_none());
    }

    #[test]
    fn task_item_round_trips_due_date_string() {
        let task = Task {
            id: Uuid::new_v4(),
            name: "water plants".into(),
            due_date: Some(datetime!(2024-05-29 18:30:00)),
            completed: false,
            favorite: true,
            list_id: Uuid::new_v4(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let item = TaskItem::from(task);
        assert_eq!(item.due_date.as_deref(), Some("2024-05-29 18:30:00"));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("water plants"));
        assert!(json.contains(r#""favorite":true"#));
    }
}
