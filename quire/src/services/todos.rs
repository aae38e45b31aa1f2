use crate::domain::{NewTodo, Todo, TodoChanges, TodoId};
use crate::ports::TodoStore;
use shared::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Application service for the todo resource.
/// Every write is validated here before it can reach the store.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Todo>> {
        debug!("Querying todos");
        let todos = self.store.list().await?;
        debug!(rows = todos.len(), "Todo query successful");
        Ok(todos)
    }

    pub async fn create(&self, title: String, completed: Option<bool>) -> Result<Todo> {
        let title = require_title(title)?;
        debug!(title = %title, "Inserting todo");

        let todo = self
            .store
            .create(NewTodo {
                title,
                completed: completed.unwrap_or(false),
            })
            .await?;

        debug!(id = todo.id, "Insert successful");
        Ok(todo)
    }

    pub async fn update(&self, id: TodoId, title: String, completed: bool) -> Result<Todo> {
        let title = require_title(title)?;
        debug!(id, "Updating todo");

        self.store
            .update(id, TodoChanges { title, completed })
            .await?
            .ok_or_else(|| Error::NotFound(format!("todo {}", id)))
    }

    pub async fn delete(&self, id: TodoId) -> Result<()> {
        debug!(id, "Deleting todo");
        self.store.delete(id).await
    }
}

fn require_title(title: String) -> Result<String> {
    if title.trim().is_empty() {
        return Err(Error::validation("title", "title must not be empty"));
    }
    Ok(title)
}
