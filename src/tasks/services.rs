use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::AppError,
    tasks::{
        dto::{CreateTaskRequest, UpdateTaskRequest},
        repo::TaskRepo,
        repo_types::{NewTask, Task, TaskPatch},
    },
};

fn clean_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    Ok(title.to_string())
}

/// Blank descriptions are stored as no description.
fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

pub async fn create_task(
    tasks: &dyn TaskRepo,
    owner_id: Uuid,
    req: CreateTaskRequest,
) -> Result<Task, AppError> {
    let new_task = NewTask {
        title: clean_title(&req.title)?,
        description: clean_description(req.description),
        priority: req.priority.unwrap_or_default(),
        due_date: req.due_date,
    };
    let task = tasks.create(owner_id, new_task).await?;
    info!(task_id = %task.id, owner_id = %owner_id, "task created");
    Ok(task)
}

pub async fn list_tasks(tasks: &dyn TaskRepo, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
    Ok(tasks.list_by_owner(owner_id).await?)
}

pub async fn get_task(tasks: &dyn TaskRepo, owner_id: Uuid, id: Uuid) -> Result<Task, AppError> {
    tasks.find(owner_id, id).await?.ok_or(AppError::NotFound)
}

pub async fn update_task(
    tasks: &dyn TaskRepo,
    owner_id: Uuid,
    id: Uuid,
    req: UpdateTaskRequest,
) -> Result<Task, AppError> {
    let patch = TaskPatch {
        title: req.title.as_deref().map(clean_title).transpose()?,
        description: req.description.map(clean_description),
        completed: req.completed,
        priority: req.priority,
        due_date: req.due_date,
    };

    if patch.is_empty() {
        debug!(task_id = %id, "empty update");
        return get_task(tasks, owner_id, id).await;
    }

    let task = tasks
        .update(owner_id, id, patch)
        .await?
        .ok_or(AppError::NotFound)?;
    info!(task_id = %id, owner_id = %owner_id, completed = task.completed, "task updated");
    Ok(task)
}

pub async fn delete_task(tasks: &dyn TaskRepo, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
    if !tasks.delete(owner_id, id).await? {
        return Err(AppError::NotFound);
    }
    info!(task_id = %id, owner_id = %owner_id, "task deleted");
    Ok(())
}
