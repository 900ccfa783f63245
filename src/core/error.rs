use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Every action error is recoverable: a rejected action mutates nothing and
/// does not advance the turn, so the caller may correct and resubmit.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("insufficient resources: need {needed} {resource}, have {available:.0}")]
    InsufficientResources {
        resource: &'static str,
        needed: u32,
        available: f32,
    },

    #[error("invalid level {level}: {reason}")]
    InvalidLevel { level: usize, reason: &'static str },

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("simulation already reached a terminal state")]
    AlreadyTerminal,

    #[error("invalid config: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
