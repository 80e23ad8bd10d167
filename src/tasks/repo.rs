use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::tasks::repo_types::{NewTask, Task, TaskPatch, TaskRow};

/// Task store. Every method takes the owner, and rows belonging to anyone
/// else are invisible to it.
#[async_trait]
pub trait TaskRepo: Send + Sync {
    async fn create(&self, owner_id: Uuid, task: NewTask) -> anyhow::Result<Task>;
    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Task>>;
    async fn find(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<Option<Task>>;
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> anyhow::Result<Option<Task>>;
    /// Returns whether a row was removed.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgTaskRepo {
    db: PgPool,
}

impl PgTaskRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepo for PgTaskRepo {
    async fn create(&self, owner_id: Uuid, task: NewTask) -> anyhow::Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (id, owner_id, title, description, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, title, description, completed, priority, due_date, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .fetch_one(&self.db)
        .await
        .context("insert task")?;
        row.try_into()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, owner_id, title, description, completed, priority, due_date, created_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
        .context("list tasks by owner")?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, owner_id, title, description, completed, priority, due_date, created_at
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("find task")?;
        row.map(Task::try_from).transpose()
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: TaskPatch,
    ) -> anyhow::Result<Option<Task>> {
        // Nullable columns carry a "present" flag so NULL can mean "clear".
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks SET
                title       = COALESCE($3, title),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                completed   = COALESCE($6, completed),
                priority    = COALESCE($7, priority),
                due_date    = CASE WHEN $8 THEN $9 ELSE due_date END
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, description, completed, priority, due_date, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.description.is_some())
        .bind(patch.description.flatten())
        .bind(patch.completed)
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(patch.due_date.is_some())
        .bind(patch.due_date.flatten())
        .fetch_optional(&self.db)
        .await
        .context("update task")?;
        row.map(Task::try_from).transpose()
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM tasks WHERE id = $1 AND owner_id = $2"#)
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await
            .context("delete task")?;
        Ok(res.rows_affected() > 0)
    }
}
