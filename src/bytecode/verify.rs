use thiserror::Error;

use crate::bytecode::Op;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bytecode check error at ip={ip}: {message}")]
pub struct VerifyError {
    pub ip: usize,
    pub message: String,
}

impl VerifyError {
    fn new(ip: usize, message: impl Into<String>) -> Self {
        Self {
            ip,
            message: message.into(),
        }
    }
}

/// Checks that a program is safe to hand to the VM.
///
/// Run-length ops need a count of at least one. Every `JumpIfZero(j)` at
/// `i` must land just past a `JumpIfNonZero(i + 1)`, and every
/// `JumpIfNonZero(k)` at `i` must land just past a `JumpIfZero(i + 1)`.
pub fn check_ops(ops: &[Op]) -> Result<(), VerifyError> {
    for (ip, op) in ops.iter().enumerate() {
        match *op {
            Op::JumpIfZero(target) => {
                let close = target
                    .checked_sub(1)
                    .filter(|&c| c > ip)
                    .ok_or_else(|| VerifyError::new(ip, format!("bad loop exit target {}", target)))?;
                match ops.get(close) {
                    Some(Op::JumpIfNonZero(back)) if *back == ip + 1 => {}
                    other => {
                        return Err(VerifyError::new(
                            ip,
                            format!("loop exit target {} is not its closing op (found {:?})", target, other),
                        ));
                    }
                }
            }
            Op::JumpIfNonZero(target) => {
                let open = target
                    .checked_sub(1)
                    .filter(|&o| o < ip)
                    .ok_or_else(|| VerifyError::new(ip, format!("bad loop back target {}", target)))?;
                match ops[open] {
                    Op::JumpIfZero(fwd) if fwd == ip + 1 => {}
                    other => {
                        return Err(VerifyError::new(
                            ip,
                            format!("loop back target {} is not its opening op (found {:?})", target, other),
                        ));
                    }
                }
            }
            _ => {
                if op.operand() == 0 {
                    return Err(VerifyError::new(ip, format!("{} has a zero repeat count", op.name())));
                }
            }
        }
    }

    Ok(())
}
