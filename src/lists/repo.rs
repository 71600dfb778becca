use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

/// To-do list record. Externally always addressed by `url_key`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TodoList {
    pub id: Uuid,
    pub url_key: String,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub task_count: i32,
    pub archived: bool,
    pub user_id: Uuid,
}

const URL_KEY_LEN: usize = 10;
const URL_KEY_ATTEMPTS: usize = 3;

fn new_url_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(URL_KEY_LEN)
        .map(char::from)
        .collect()
}

impl TodoList {
    /// Caller's lists still shown on the default view.
    pub async fn list_active_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<TodoList>> {
        let rows = sqlx::query_as::<_, TodoList>(
            r#"
            SELECT id, url_key, name, created_at, task_count, archived, user_id
            FROM lists
            WHERE user_id = $1 AND archived = FALSE
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_key(
        db: &PgPool,
        user_id: Uuid,
        url_key: &str,
    ) -> anyhow::Result<Option<TodoList>> {
        let list = sqlx::query_as::<_, TodoList>(
            r#"
            SELECT id, url_key, name, created_at, task_count, archived, user_id
            FROM lists
            WHERE url_key = $1 AND user_id = $2
            "#,
        )
        .bind(url_key)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(list)
    }

    /// Names of the caller's lists created on `date` that start with `prefix`.
    /// Candidate set for the new-list naming scope.
    pub async fn names_created_on(
        db: &PgPool,
        user_id: Uuid,
        prefix: &str,
        date: Date,
    ) -> anyhow::Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM lists
            WHERE user_id = $1
              AND name LIKE $2 || '%'
              AND created_at::date = $3
            "#,
        )
        .bind(user_id)
        .bind(prefix)
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(names)
    }

    async fn insert(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        url_key: &str,
        task_count: i32,
    ) -> Result<TodoList, sqlx::Error> {
        sqlx::query_as::<_, TodoList>(
            r#"
            INSERT INTO lists (url_key, name, task_count, archived, user_id)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id, url_key, name, created_at, task_count, archived, user_id
            "#,
        )
        .bind(url_key)
        .bind(name)
        .bind(task_count)
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    /// Create a list under a freshly generated url key. A key collision is
    /// a unique-constraint violation; regenerate and retry a few times
    /// before giving up.
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        task_count: i32,
    ) -> anyhow::Result<TodoList> {
        for _ in 0..URL_KEY_ATTEMPTS {
            let url_key = new_url_key();
            match Self::insert(db, user_id, name, &url_key, task_count).await {
                Ok(list) => return Ok(list),
                Err(e) => match &e {
                    sqlx::Error::Database(db_err)
                        if db_err.is_unique_violation()
                            && db_err.constraint().is_some_and(|c| c.contains("url_key")) =>
                    {
                        warn!(url_key = %url_key, "url key collision, retrying");
                        continue;
                    }
                    _ => return Err(e.into()),
                },
            }
        }
        anyhow::bail!("could not allocate a unique url key")
    }

    pub async fn rename(db: &PgPool, id: Uuid, name: &str) -> anyhow::Result<TodoList> {
        let list = sqlx::query_as::<_, TodoList>(
            r#"
            UPDATE lists SET name = $2
            WHERE id = $1
            RETURNING id, url_key, name, created_at, task_count, archived, user_id
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_one(db)
        .await?;
        Ok(list)
    }

    /// Boolean flip; returns the row with its new archived state.
    pub async fn toggle_archived(db: &PgPool, id: Uuid) -> anyhow::Result<TodoList> {
        let list = sqlx::query_as::<_, TodoList>(
            r#"
            UPDATE lists SET archived = NOT archived
            WHERE id = $1
            RETURNING id, url_key, name, created_at, task_count, archived, user_id
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(list)
    }

    pub async fn update_task_count(db: &PgPool, id: Uuid, task_count: i32) -> anyhow::Result<()> {
        sqlx::query("UPDATE lists SET task_count = $2 WHERE id = $1")
            .bind(id)
            .bind(task_count)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Delete the list and everything in it, children before parent.
    pub async fn delete_cascade(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM tasks WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_keys_are_short_and_alphanumeric() {
        let key = new_url_key();
        assert_eq!(key.len(), URL_KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn url_keys_vary() {
        let a = new_url_key();
        let b = new_url_key();
        assert_ne!(a, b);
    }
}
