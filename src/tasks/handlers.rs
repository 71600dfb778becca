use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiResult, Flash},
    lists::naming,
    lists::repo::TodoList,
    state::AppState,
    tasks::{
        dto::{parse_due_date, CreateTaskRequest, TaskResponse, UpdateTaskRequest},
        repo::Task,
    },
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/lists/:key/tasks", post(create_task))
        .route(
            "/lists/:key/tasks/:id",
            patch(update_task).delete(delete_task),
        )
        .route("/lists/:key/tasks/:id/complete", post(toggle_complete))
        .route("/lists/:key/tasks/:id/favorite", post(toggle_favorite))
}

async fn owned_list(state: &AppState, user_id: Uuid, key: &str) -> ApiResult<TodoList> {
    TodoList::find_by_key(&state.db, user_id, key)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".into()))
}

async fn owned_task(state: &AppState, list: &TodoList, task_id: Uuid) -> ApiResult<Task> {
    Task::find_in_list(&state.db, list.id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))
}

#[instrument(skip(state, body))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(key): Path<String>,
    Json(body): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let title = body.name.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Task title is required".into()));
    }
    // Reject a malformed due date before anything is written.
    let due_date = match body.due_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(
            parse_due_date(raw)
                .ok_or_else(|| ApiError::BadRequest("Invalid due date".into()))?,
        ),
        _ => None,
    };

    let list = owned_list(&state, user_id, &key).await?;

    let existing = Task::names_with_prefix(&state.db, list.id, title).await?;
    let name = naming::disambiguate(title, &existing);

    let task = Task::create(&state.db, list.id, &name, due_date).await?;
    info!(task_id = %task.id, list_id = %list.id, "task created");

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            task: task.into(),
            flash: Flash::success(
                "Great, a new task created. You can add a due date or mark it as favorite.",
            ),
        }),
    ))
}

#[instrument(skip(state, body))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((key, id)): Path<(String, Uuid)>,
    Json(body): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let new_name = match body.name.as_deref().map(str::trim) {
        Some("") => return Err(ApiError::BadRequest("Task title cannot be empty".into())),
        other => other,
    };
    let new_due = match body.due_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(
            parse_due_date(raw)
                .ok_or_else(|| ApiError::BadRequest("Invalid due date".into()))?,
        ),
        _ => None,
    };
    if new_name.is_none() && new_due.is_none() {
        return Err(ApiError::BadRequest("Nothing to update".into()));
    }

    let list = owned_list(&state, user_id, &key).await?;
    let mut task = owned_task(&state, &list, id).await?;

    if let Some(name) = new_name {
        task = Task::rename(&state.db, task.id, name).await?;
    }
    if let Some(due) = new_due {
        task = Task::set_due_date(&state.db, task.id, due).await?;
    }

    let flash = match (new_name.is_some(), new_due.is_some()) {
        (true, false) => Flash::success("Task's name has been updated!"),
        (false, true) => Flash::success(format!(
            "Due date of task \"{}\" has been added!",
            task.name
        )),
        _ => Flash::success("Task has been updated!"),
    };

    Ok(Json(TaskResponse {
        task: task.into(),
        flash,
    }))
}

#[instrument(skip(state))]
pub async fn toggle_complete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((key, id)): Path<(String, Uuid)>,
) -> ApiResult<Json<TaskResponse>> {
    let list = owned_list(&state, user_id, &key).await?;
    let task = owned_task(&state, &list, id).await?;
    let task = Task::toggle_completed(&state.db, task.id).await?;

    let all = Task::list_by_list(&state.db, list.id).await?;
    let flash = if !all.is_empty() && all.iter().all(|t| t.completed) {
        Flash::success("All tasks finished! Good job!")
    } else if task.completed {
        Flash::success(format!(
            "Status of task \"{}\" has been changed to completed!",
            task.name
        ))
    } else {
        Flash::success(format!("Status of task \"{}\" has been changed!", task.name))
    };

    Ok(Json(TaskResponse {
        task: task.into(),
        flash,
    }))
}

#[instrument(skip(state))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((key, id)): Path<(String, Uuid)>,
) -> ApiResult<Json<TaskResponse>> {
    let list = owned_list(&state, user_id, &key).await?;
    let task = owned_task(&state, &list, id).await?;
    let task = Task::toggle_favorite(&state.db, task.id).await?;

    let flash = if task.favorite {
        Flash::success(format!("Task \"{}\" has been starred!", task.name))
    } else {
        Flash::success(format!("Task \"{}\" has been unstarred!", task.name))
    };

    Ok(Json(TaskResponse {
        task: task.into(),
        flash,
    }))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((key, id)): Path<(String, Uuid)>,
) -> ApiResult<Json<Flash>> {
    let list = owned_list(&state, user_id, &key).await?;
    let task = owned_task(&state, &list, id).await?;

    Task::delete(&state.db, task.id).await?;
    info!(task_id = %task.id, list_id = %list.id, "task deleted");

    Ok(Json(Flash::success(format!(
        "Task \"{}\" has been deleted!",
        task.name
    ))))
}
