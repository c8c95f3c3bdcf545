use serde::{Deserialize, Serialize};

// =============================================================================
// OP - Bytecode instructions
// =============================================================================

/// Placeholder target of a `JumpIfZero` whose `]` has not been seen yet.
/// Never survives a successful compile.
pub const UNRESOLVED: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    // ==========================================================================
    // Run-length ops: the operand is a repeat count, always >= 1
    // ==========================================================================
    Right(usize),
    Left(usize),
    Incr(usize),
    Decr(usize),
    Output(usize),
    Input(usize),

    // ==========================================================================
    // Loops: the operand is an absolute instruction index
    // ==========================================================================
    /// `[`: if the current cell is zero, jump to the instruction after the
    /// matching `JumpIfNonZero`.
    JumpIfZero(usize),

    /// `]`: if the current cell is nonzero, jump to the instruction after the
    /// matching `JumpIfZero`.
    JumpIfNonZero(usize),
}

impl Op {
    pub fn operand(&self) -> usize {
        match *self {
            Op::Right(n)
            | Op::Left(n)
            | Op::Incr(n)
            | Op::Decr(n)
            | Op::Output(n)
            | Op::Input(n)
            | Op::JumpIfZero(n)
            | Op::JumpIfNonZero(n) => n,
        }
    }

    pub fn is_jump(&self) -> bool {
        matches!(self, Op::JumpIfZero(_) | Op::JumpIfNonZero(_))
    }

    /// Mnemonic used by the disassembler.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Right(_) => "RIGHT",
            Op::Left(_) => "LEFT",
            Op::Incr(_) => "INCR",
            Op::Decr(_) => "DECR",
            Op::Output(_) => "OUTPUT",
            Op::Input(_) => "INPUT",
            Op::JumpIfZero(_) => "JUMP_ZERO",
            Op::JumpIfNonZero(_) => "JUMP_NONZERO",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name(), self.operand())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_and_display() {
        assert_eq!(Op::Decr(7).operand(), 7);
        assert_eq!(Op::JumpIfZero(3).to_string(), "JUMP_ZERO 3");
        assert!(Op::JumpIfNonZero(1).is_jump());
        assert!(!Op::Output(1).is_jump());
    }
}
