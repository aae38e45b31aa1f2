use crate::api::{CreateTodoRequest, ExpireRequest, SetValueRequest, UpdateTodoRequest};
use quire::{CacheEntry, TodoId};
use shared::TtlSecs;

#[derive(Debug, PartialEq)]
pub enum ValidationError {
    MissingRequiredField { field: &'static str },
    EmptyField { field: &'static str },
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u64,
        max: u64,
    },
    InvalidId(String),
    MalformedBody(String),
}

impl ValidationError {
    /// Name of the offending field, when the failure is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingRequiredField { field }
            | ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. } => Some(field),
            ValidationError::InvalidId(_) => Some("id"),
            ValidationError::MalformedBody(_) => None,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequiredField { field } => {
                write!(f, "Missing required field '{}'", field)
            }
            ValidationError::EmptyField { field } => {
                write!(f, "Field '{}' must not be empty", field)
            }
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "Field '{}' value {} is out of range (min: {}, max: {})",
                    field, value, min, max
                )
            }
            ValidationError::InvalidId(raw) => {
                write!(f, "Invalid id '{}'. Must be a positive integer", raw)
            }
            ValidationError::MalformedBody(reason) => {
                write!(f, "Malformed request body: {}", reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validated input for creating a todo
#[derive(Debug, PartialEq)]
pub struct NewTodoInput {
    pub title: String,
    pub completed: Option<bool>,
}

/// Validated input for replacing a todo
#[derive(Debug, PartialEq)]
pub struct TodoChangesInput {
    pub title: String,
    pub completed: bool,
}

/// Turns raw request bodies and path segments into validated domain input.
/// Nothing here touches a backend.
pub struct RequestValidator;

impl RequestValidator {
    pub fn new_todo(req: CreateTodoRequest) -> Result<NewTodoInput, ValidationError> {
        Ok(NewTodoInput {
            title: Self::require_text("title", req.title)?,
            completed: req.completed,
        })
    }

    pub fn todo_changes(req: UpdateTodoRequest) -> Result<TodoChangesInput, ValidationError> {
        let title = Self::require_text("title", req.title)?;
        let completed = req
            .completed
            .ok_or(ValidationError::MissingRequiredField { field: "completed" })?;
        Ok(TodoChangesInput { title, completed })
    }

    pub fn todo_id(raw: &str) -> Result<TodoId, ValidationError> {
        match raw.parse::<TodoId>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(ValidationError::InvalidId(raw.to_string())),
        }
    }

    pub fn cache_entry(req: SetValueRequest) -> Result<CacheEntry, ValidationError> {
        let key = Self::require_text("key", req.key)?;
        // An empty value is a legitimate string.
        let value = req
            .value
            .ok_or(ValidationError::MissingRequiredField { field: "value" })?;
        let ttl = req.ttl.map(|ttl| Self::ttl_secs("ttl", ttl)).transpose()?;
        Ok(CacheEntry { key, value, ttl })
    }

    pub fn expiry(req: ExpireRequest) -> Result<TtlSecs, ValidationError> {
        let ttl = req
            .ttl
            .ok_or(ValidationError::MissingRequiredField { field: "ttl" })?;
        Self::ttl_secs("ttl", ttl)
    }

    fn require_text(
        field: &'static str,
        value: Option<String>,
    ) -> Result<String, ValidationError> {
        let value = value.ok_or(ValidationError::MissingRequiredField { field })?;
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField { field });
        }
        Ok(value)
    }

    fn ttl_secs(field: &'static str, value: i64) -> Result<TtlSecs, ValidationError> {
        u64::try_from(value)
            .ok()
            .and_then(TtlSecs::new)
            .ok_or(ValidationError::OutOfRange {
                field,
                value,
                min: 1,
                max: TtlSecs::MAX,
            })
    }
}
