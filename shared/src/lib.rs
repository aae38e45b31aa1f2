// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Client supplied a malformed or missing field; never reaches a backend.
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },
    #[error("{0} not found")]
    NotFound(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("cache not connected")]
    CacheUnavailable,
    #[error("cache error: {0}")]
    Cache(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field: Some(field),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Expiry in whole seconds, within `1..=TtlSecs::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlSecs(u64);

impl TtlSecs {
    /// Roughly 68 years. Keeps `Instant` arithmetic and Redis `EX` in range.
    pub const MAX: u64 = i32::MAX as u64;

    pub fn new(secs: u64) -> Option<Self> {
        (1..=Self::MAX).contains(&secs).then_some(TtlSecs(secs))
    }

    pub fn secs(self) -> u64 {
        self.0
    }

    pub fn as_duration(self) -> std::time::Duration {
        std::time::Duration::from_secs(self.0)
    }
}

pub mod config;
