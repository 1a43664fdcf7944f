use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")] Config(String),

    #[error("Cache error: {0}")] Cache(String),

    #[error("Database error: {0}")] Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")] Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")] Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")] Unknown(String),
}

impl BotError {
    /// Errors that should bring the process down instead of being retried
    pub fn is_critical(&self) -> bool {
        match self {
            BotError::Config(_) => true,
            BotError::Io(_) => true,
            _ => false,
        }
    }
}

pub type BotResult<T> = Result<T, BotError>;
