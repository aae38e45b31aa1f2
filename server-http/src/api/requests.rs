use serde::Deserialize;

// Fields are optional so that a missing field is reported by the validator
// with its name instead of as a generic body error.

// === Todo Models ===

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

// === Cache Operation Models ===

#[derive(Debug, Deserialize)]
pub struct SetValueRequest {
    pub key: Option<String>,
    pub value: Option<String>,
    pub ttl: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ExpireRequest {
    pub ttl: Option<i64>,
}
