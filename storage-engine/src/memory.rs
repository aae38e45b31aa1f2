use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quire::domain::{NewTodo, Todo, TodoChanges, TodoId};
use quire::ports::TodoStore;
use shared::{Error, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use tokio::sync::RwLock;

/// In-memory todo table with store-assigned ids starting at 1.
/// `set_available(false)` makes every call fail as if the database were down.
#[derive(Debug)]
pub struct MemoryTodoStore {
    rows: RwLock<BTreeMap<TodoId, Todo>>,
    next_id: AtomicI32,
    available: AtomicBool,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::StorageUnavailable("connection refused".to_string()))
        }
    }
}

impl Default for MemoryTodoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        self.check()?;
        let mut todos: Vec<Todo> = self.rows.read().await.values().cloned().collect();
        todos.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(todos)
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = Todo {
            id,
            title: todo.title,
            completed: todo.completed,
            created_at: Utc::now(),
        };
        self.rows.write().await.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: TodoId, changes: TodoChanges) -> Result<Option<Todo>> {
        self.check()?;
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).map(|row| {
            row.title = changes.title;
            row.completed = changes.completed;
            row.clone()
        }))
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        self.check()?;
        self.rows.write().await.remove(&id);
        Ok(())
    }

    async fn now(&self) -> Result<DateTime<Utc>> {
        self.check()?;
        Ok(Utc::now())
    }
}
