use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::Flash;
use crate::lists::repo::TodoList;
use crate::tasks::dto::TaskItem;

#[derive(Debug, Serialize)]
pub struct ListSummary {
    pub id: Uuid,
    pub url_key: String,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub task_count: i32,
    pub archived: bool,
}

impl From<TodoList> for ListSummary {
    fn from(l: TodoList) -> Self {
        Self {
            id: l.id,
            url_key: l.url_key,
            name: l.name,
            created_at: l.created_at,
            task_count: l.task_count,
            archived: l.archived,
        }
    }
}

/// List plus its tasks in display order.
#[derive(Debug, Serialize)]
pub struct ListDetail {
    pub list: ListSummary,
    pub tasks: Vec<TaskItem>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub list: ListSummary,
    pub flash: Flash,
}

#[derive(Debug, Deserialize)]
pub struct RenameListRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_summary_serializes_url_key() {
        let summary = ListSummary {
            id: Uuid::new_v4(),
            url_key: "a1B2c3D4e5".into(),
            name: "Groceries".into(),
            created_at: OffsetDateTime::now_utc(),
            task_count: 2,
            archived: false,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("a1B2c3D4e5"));
        assert!(json.contains(r#""task_count":2"#));
    }
}
