use crate::bytecode::Op;
use crate::bytecode::verify::{VerifyError, check_ops};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A compiled bytecode program.
///
/// Indices into `ops` are instruction addresses and serve as jump targets.
/// Only the compiler and the verified decoder can build one, so every
/// `Program` carries a consistent jump table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Program {
    ops: Vec<Op>,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed bytecode: {0}")]
    Postcard(#[from] postcard::Error),

    #[error(transparent)]
    Invalid(#[from] VerifyError),
}

impl Program {
    /// Wraps ops produced by the compiler, which resolves every jump itself.
    pub(crate) fn from_compiled(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    /// Builds a program from hand-written ops, rejecting inconsistent jumps.
    pub fn from_ops(ops: Vec<Op>) -> Result<Self, VerifyError> {
        check_ops(&ops)?;
        Ok(Self { ops })
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn get(&self, ip: usize) -> Option<&Op> {
        self.ops.get(ip)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Op> {
        self.ops.iter()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawProgram = postcard::from_bytes(bytes)?;
        Ok(Self::from_ops(raw.ops)?)
    }
}

/// Unverified wire form; decoding goes through `Program::from_ops`.
#[derive(Deserialize)]
struct RawProgram {
    ops: Vec<Op>,
}

impl std::ops::Index<usize> for Program {
    type Output = Op;

    fn index(&self, ip: usize) -> &Op {
        &self.ops[ip]
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_decode() {
        let program = compile(b"++[>+++<-]>.").unwrap();
        let bytes = program.to_bytes().unwrap();
        assert_eq!(Program::from_bytes(&bytes).unwrap(), program);
    }

    #[test]
    fn test_decode_rejects_broken_jumps() {
        let forged = Program {
            ops: vec![Op::JumpIfZero(7), Op::JumpIfNonZero(1)],
        };
        let bytes = forged.to_bytes().unwrap();
        assert!(matches!(
            Program::from_bytes(&bytes),
            Err(DecodeError::Invalid(_))
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Program::from_bytes(&[0xff, 0xff, 0xff]),
            Err(DecodeError::Postcard(_))
        ));
    }

    #[test]
    fn test_index_and_iter() {
        let program = compile(b"+>").unwrap();
        assert_eq!(program[1], Op::Right(1));
        assert_eq!(program.iter().count(), 2);
        assert_eq!((&program).into_iter().next(), Some(&Op::Incr(1)));
        assert_eq!(program.get(2), None);
    }
}
