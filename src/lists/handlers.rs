use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiResult, Flash},
    lists::{
        dto::{ListDetail, ListResponse, ListSummary, RenameListRequest},
        naming,
        repo::TodoList,
    },
    state::AppState,
    tasks::{ordering::order_tasks, repo::Task},
};

pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/lists", get(my_lists).post(create_list))
        .route(
            "/lists/:key",
            get(get_list).patch(rename_list).delete(delete_list),
        )
        .route("/lists/:key/archive", post(archive_list))
        .route("/lists/:key/copy", post(copy_list))
}

async fn owned_list(state: &AppState, user_id: uuid::Uuid, key: &str) -> ApiResult<TodoList> {
    TodoList::find_by_key(&state.db, user_id, key)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".into()))
}

/// The "my lists" view: the caller's non-archived lists.
#[instrument(skip(state))]
pub async fn my_lists(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<ListSummary>>> {
    let lists = TodoList::list_active_by_user(&state.db, user_id).await?;
    Ok(Json(lists.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn create_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<(StatusCode, Json<ListResponse>)> {
    let today = OffsetDateTime::now_utc().date();
    let base = naming::default_list_name(today);

    // Same-day lists already carrying today's template name.
    let existing = TodoList::names_created_on(&state.db, user_id, &base, today).await?;
    let name = naming::disambiguate(&base, &existing);

    let list = TodoList::create(&state.db, user_id, &name, 0).await?;
    info!(list_id = %list.id, url_key = %list.url_key, "list created");

    let flash = Flash::success(format!("A new list: {} created!", list.name));
    Ok((
        StatusCode::CREATED,
        Json(ListResponse {
            list: list.into(),
            flash,
        }),
    ))
}

/// List view: tasks come back in display order and the cached task count
/// is refreshed to the actual count.
#[instrument(skip(state))]
pub async fn get_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(key): Path<String>,
) -> ApiResult<Json<ListDetail>> {
    let mut list = owned_list(&state, user_id, &key).await?;

    let tasks = Task::list_by_list(&state.db, list.id).await?;
    let tasks = order_tasks(tasks);

    let count = tasks.len() as i32;
    if list.task_count != count {
        TodoList::update_task_count(&state.db, list.id, count).await?;
        list.task_count = count;
    }

    Ok(Json(ListDetail {
        list: list.into(),
        tasks: tasks.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, body))]
pub async fn rename_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(key): Path<String>,
    Json(body): Json<RenameListRequest>,
) -> ApiResult<Json<ListResponse>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("List name is required".into()));
    }

    let list = owned_list(&state, user_id, &key).await?;
    let list = TodoList::rename(&state.db, list.id, name).await?;
    info!(list_id = %list.id, "list renamed");

    Ok(Json(ListResponse {
        list: list.into(),
        flash: Flash::success("List's name has been updated!"),
    }))
}

#[instrument(skip(state))]
pub async fn archive_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(key): Path<String>,
) -> ApiResult<Json<ListResponse>> {
    let list = owned_list(&state, user_id, &key).await?;
    let list = TodoList::toggle_archived(&state.db, list.id).await?;

    let flash = if list.archived {
        Flash::success(format!("\"{}\" has been archived!", list.name))
    } else {
        Flash::success(format!(
            "\"{}\" has been unarchived! You can find it in your lists.",
            list.name
        ))
    };

    Ok(Json(ListResponse {
        list: list.into(),
        flash,
    }))
}

/// Clone a list with its tasks. The new list gets a fresh url key and the
/// `(copy)` name; the cached task count is carried over from the source
/// as-is rather than recomputed, matching the historical behavior.
#[instrument(skip(state))]
pub async fn copy_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(key): Path<String>,
) -> ApiResult<(StatusCode, Json<ListResponse>)> {
    let source = owned_list(&state, user_id, &key).await?;

    let name = naming::copy_name(&source.name);
    let new_list = TodoList::create(&state.db, user_id, &name, source.task_count).await?;

    let tasks = Task::list_by_list(&state.db, source.id).await?;
    for task in &tasks {
        Task::insert(&state.db, new_list.id, &task.as_copy()).await?;
    }
    info!(
        source_id = %source.id,
        list_id = %new_list.id,
        tasks = tasks.len(),
        "list copied"
    );

    Ok((
        StatusCode::CREATED,
        Json(ListResponse {
            list: new_list.into(),
            flash: Flash::success("List copied successfully!"),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn delete_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(key): Path<String>,
) -> ApiResult<Json<Flash>> {
    let list = owned_list(&state, user_id, &key).await?;

    TodoList::delete_cascade(&state.db, list.id).await?;
    info!(list_id = %list.id, "list deleted");

    Ok(Json(Flash::success(format!(
        "\"{}\" deleted successfully!",
        list.name
    ))))
}
