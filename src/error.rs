use thiserror::Error;

pub type GrapherResult<T> = Result<T, GrapherError>;
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum GrapherError {
    #[error(transparent)]
    Initialization(#[from] InitError),

    #[error("engine rejected graph sync: {0}")]
    Sync(#[source] EngineError),

    /// Raised by any engine access after the handle was released.
    ///
    /// Callers treat it as a no-op; it never reaches the user.
    #[error("engine handle for surface `{surface}` was already released")]
    StaleHandle { surface: String },

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl GrapherError {
    #[must_use]
    pub fn is_stale_handle(&self) -> bool {
        matches!(self, Self::StaleHandle { .. })
    }
}

/// Failure to bring an engine up on a surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("surface `{surface}` does not support {capability}")]
    Unsupported { surface: String, capability: String },

    #[error("engine could not be created on surface `{surface}`: {reason}")]
    Rejected { surface: String, reason: String },
}

impl InitError {
    /// Message suitable for a fallback screen shown in place of the graph.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unsupported { capability, .. } => {
                format!("{capability} Unsupported, Please update your browser")
            }
            Self::Rejected { reason, .. } => reason.clone(),
        }
    }
}

/// Error reported by the engine itself. The message is surfaced verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
