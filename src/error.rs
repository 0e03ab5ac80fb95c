use thiserror::Error;

/// Errors raised by league operations.
#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("at least 2 competitors required, got {count}")]
    InvalidRoster { count: usize },

    #[error("end of season, no more rounds to play")]
    SeasonExhausted,

    #[error("schedule inconsistency: {0}")]
    ScheduleInconsistency(String),

    #[error("duplicate competitor: {0}")]
    DuplicateCompetitor(String),

    #[error("competitor name is required")]
    EmptyName,

    #[error("unknown competitor: {0}")]
    UnknownCompetitor(String),

    #[error("strength of {name} must be between 1 and 100, got {strength}")]
    InvalidStrength { name: String, strength: u32 },

    #[error("unknown league: {0}")]
    UnknownLeague(u64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl LeagueError {
    /// Internal invariant violations. Retrying reproduces them, so callers
    /// should abort instead.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LeagueError::ScheduleInconsistency(_))
    }
}

pub type Result<T> = std::result::Result<T, LeagueError>;
