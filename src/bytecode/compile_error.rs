use thiserror::Error;

use crate::frontend::token::Span;

/// Which side of a loop was left without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// A `[` that is never closed
    Open,
    /// A `]` with no `[` before it
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// An unmatched `[` or `]`, located at the offending bracket
    #[error("{span}: loop mismatch: {}", bracket_reason(.bracket))]
    LoopMismatch { span: Span, bracket: Bracket },
}

fn bracket_reason(bracket: &Bracket) -> &'static str {
    match bracket {
        Bracket::Open => "`[` is never closed",
        Bracket::Close => "`]` has no matching `[`",
    }
}

impl CompileError {
    pub fn unmatched(span: Span, bracket: Bracket) -> Self {
        CompileError::LoopMismatch { span, bracket }
    }

    pub fn span(&self) -> Span {
        match self {
            CompileError::LoopMismatch { span, .. } => *span,
        }
    }

    pub fn line(&self) -> usize {
        self.span().line
    }

    pub fn col(&self) -> usize {
        self.span().col
    }

    /// The diagnostic text without the position prefix.
    pub fn message(&self) -> String {
        match self {
            CompileError::LoopMismatch { bracket, .. } => {
                format!("loop mismatch: {}", bracket_reason(bracket))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_has_position() {
        let err = CompileError::unmatched(Span { line: 2, col: 5 }, Bracket::Close);
        assert_eq!(err.to_string(), "2:5: loop mismatch: `]` has no matching `[`");
        assert_eq!(err.line(), 2);
        assert_eq!(err.col(), 5);
    }

    #[test]
    fn test_message_drops_position() {
        let err = CompileError::unmatched(Span { line: 1, col: 1 }, Bracket::Open);
        assert_eq!(err.message(), "loop mismatch: `[` is never closed");
    }
}
