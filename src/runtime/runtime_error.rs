use thiserror::Error;

/// Errors that stop a running program. Output already written stays written.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("memory overflow: head moved to {head}, past the last cell {max}")]
    MemoryOverflow { head: usize, max: usize },

    #[error("memory underflow: cannot move head {head} left by {by}")]
    MemoryUnderflow { head: usize, by: usize },

    #[error("cannot convert \"{raw}\" to int")]
    InputConversion { raw: String },

    #[error("execution step limit exceeded ({0})")]
    StepLimitExceeded(usize),

    #[error("execution cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn memory_overflow(head: usize, max: usize) -> RuntimeError {
    RuntimeError::MemoryOverflow { head, max }
}

pub fn memory_underflow(head: usize, by: usize) -> RuntimeError {
    RuntimeError::MemoryUnderflow { head, by }
}

pub fn input_conversion(raw: impl Into<String>) -> RuntimeError {
    RuntimeError::InputConversion { raw: raw.into() }
}
