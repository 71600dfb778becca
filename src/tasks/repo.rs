use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

/// Task record. Lives and dies with its list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub due_date: Option<PrimitiveDateTime>,
    pub completed: bool,
    pub favorite: bool,
    pub list_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// Field set written for a new task row; the store assigns id, list
/// membership and creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub due_date: Option<PrimitiveDateTime>,
    pub completed: bool,
    pub favorite: bool,
}

impl NewTask {
    /// A freshly created task: not completed, not starred.
    pub fn fresh(name: &str, due_date: Option<PrimitiveDateTime>) -> Self {
        Self {
            name: name.to_string(),
            due_date,
            completed: false,
            favorite: false,
        }
    }
}

impl Task {
    /// Field set for cloning this task into another list: name, due date
    /// and both flags carry over; identifiers do not.
    pub fn as_copy(&self) -> NewTask {
        NewTask {
            name: self.name.clone(),
            due_date: self.due_date,
            completed: self.completed,
            favorite: self.favorite,
        }
    }

    /// Tasks of a list, oldest first, so the display sort's tie-break
    /// means creation order.
    pub async fn list_by_list(db: &PgPool, list_id: Uuid) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, due_date, completed, favorite, list_id, created_at
            FROM tasks
            WHERE list_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(list_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Resolve a task through its list; a task id outside `list_id`
    /// comes back as absent.
    pub async fn find_in_list(
        db: &PgPool,
        list_id: Uuid,
        task_id: Uuid,
    ) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, due_date, completed, favorite, list_id, created_at
            FROM tasks
            WHERE id = $1 AND list_id = $2
            "#,
        )
        .bind(task_id)
        .bind(list_id)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    /// Task names in the list starting with `prefix`; candidate set for
    /// the task naming scope.
    pub async fn names_with_prefix(
        db: &PgPool,
        list_id: Uuid,
        prefix: &str,
    ) -> anyhow::Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM tasks
            WHERE list_id = $1 AND name LIKE $2 || '%'
            "#,
        )
        .bind(list_id)
        .bind(prefix)
        .fetch_all(db)
        .await?;
        Ok(names)
    }

    pub async fn create(
        db: &PgPool,
        list_id: Uuid,
        name: &str,
        due_date: Option<PrimitiveDateTime>,
    ) -> anyhow::Result<Task> {
        Self::insert(db, list_id, &NewTask::fresh(name, due_date)).await
    }

    pub async fn insert(db: &PgPool, list_id: Uuid, new: &NewTask) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (name, due_date, completed, favorite, list_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, due_date, completed, favorite, list_id, created_at
            "#,
        )
        .bind(&new.name)
        .bind(new.due_date)
        .bind(new.completed)
        .bind(new.favorite)
        .bind(list_id)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn rename(db: &PgPool, id: Uuid, name: &str) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET name = $2
            WHERE id = $1
            RETURNING id, name, due_date, completed, favorite, list_id, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn set_due_date(
        db: &PgPool,
        id: Uuid,
        due_date: PrimitiveDateTime,
    ) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET due_date = $2
            WHERE id = $1
            RETURNING id, name, due_date, completed, favorite, list_id, created_at
            "#,
        )
        .bind(id)
        .bind(due_date)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn toggle_completed(db: &PgPool, id: Uuid) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET completed = NOT completed
            WHERE id = $1
            RETURNING id, name, due_date, completed, favorite, list_id, created_at
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn toggle_favorite(db: &PgPool, id: Uuid) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET favorite = NOT favorite
            WHERE id = $1
            RETURNING id, name, due_date, completed, favorite, list_id, created_at
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_task() -> Task {
        Task {
            id: Uuid::new_v4(),
            name: "water plants".into(),
            due_date: Some(datetime!(2024-05-29 18:30:00)),
            completed: true,
            favorite: true,
            list_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn fresh_tasks_start_incomplete_and_unstarred() {
        let new = NewTask::fresh("water plants", None);
        assert!(!new.completed);
        assert!(!new.favorite);
        assert_eq!(new.name, "water plants");
        assert!(new.due_date.is_none());
    }

    #[test]
    fn copy_carries_name_due_date_and_flags() {
        let task = sample_task();
        let copy = task.as_copy();
        assert_eq!(copy.name, task.name);
        assert_eq!(copy.due_date, task.due_date);
        assert!(copy.completed);
        assert!(copy.favorite);
    }

    #[test]
    fn copy_of_a_plain_task_stays_plain() {
        let mut task = sample_task();
        task.completed = false;
        task.favorite = false;
        task.due_date = None;
        let copy = task.as_copy();
        assert_eq!(copy, NewTask::fresh(&task.name, None));
    }
}
