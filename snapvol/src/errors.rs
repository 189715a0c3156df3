use snapvol_hal::HalError;
use thiserror::Error;

/// Result type alias for snapvol operations
pub type Result<T> = std::result::Result<T, SnapvolError>;

#[derive(Error, Debug)]
pub enum SnapvolError {
    /// An external utility could not be started or exited non-zero.
    #[error("{program} failed (exit={code:?}): {output}")]
    Invocation {
        program: String,
        code: Option<i32>,
        output: String,
    },

    /// Structured output was absent or malformed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The root volume is not in a state we are willing to mount.
    #[error("{0}")]
    Precondition(String),

    /// The mount command succeeded but its result is not visible.
    #[error("{0}")]
    Verification(String),

    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Hal(HalError),
}

impl From<HalError> for SnapvolError {
    fn from(err: HalError) -> Self {
        match err {
            HalError::CommandFailed {
                program,
                code,
                stderr,
            } => SnapvolError::Invocation {
                program,
                code,
                output: stderr,
            },
            HalError::CommandNotFound(program) => SnapvolError::Invocation {
                program,
                code: None,
                output: "command not found".to_string(),
            },
            HalError::Parse(msg) => SnapvolError::Parse(msg),
            other => SnapvolError::Hal(other),
        }
    }
}
