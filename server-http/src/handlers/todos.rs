use crate::api::{CreateTodoRequest, SuccessResponse, TodoResponse, UpdateTodoRequest};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

/// GET /todos
pub async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    info!("Listing todos");

    let todos = state.todos.list().await?;
    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

/// POST /todos
pub async fn create_todo(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let input = RequestValidator::new_todo(req)?;
    info!("Creating todo: {}", input.title);

    let todo = state.todos.create(input.title, input.completed).await?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// PUT /todos/{id}
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    let id = RequestValidator::todo_id(&id)?;
    let input = RequestValidator::todo_changes(req)?;
    info!("Updating todo {}", id);

    let todo = state
        .todos
        .update(id, input.title, input.completed)
        .await?;
    Ok(Json(todo.into()))
}

/// DELETE /todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = RequestValidator::todo_id(&id)?;
    info!("Deleting todo {}", id);

    state.todos.delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
