use std::io::{self, Write};

use crate::bytecode::{Op, Program};

/// Write a listing of `program`, one instruction per line.
///
/// Loop bodies are indented and every jump target is marked with `►`.
pub fn disassemble<W: Write>(program: &Program, out: &mut W) -> io::Result<()> {
    let jump_targets = collect_jump_targets(program.ops());
    let mut depth: usize = 0;

    writeln!(out, "{} instructions", program.len())?;

    for (ip, op) in program.iter().enumerate() {
        if matches!(op, Op::JumpIfNonZero(_)) {
            depth = depth.saturating_sub(1);
        }

        let marker = if jump_targets.contains(&ip) { "► " } else { "  " };
        let prefix = "  ".repeat(depth);
        write!(out, "{:04} {}{}", ip, marker, prefix)?;
        print_op(op, out)?;

        if matches!(op, Op::JumpIfZero(_)) {
            depth += 1;
        }
    }

    Ok(())
}

fn collect_jump_targets(ops: &[Op]) -> Vec<usize> {
    let mut targets = Vec::new();

    for op in ops {
        if op.is_jump() {
            let target = op.operand();
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
    }

    targets
}

fn print_op<W: Write>(op: &Op, out: &mut W) -> io::Result<()> {
    match op {
        Op::Right(n) | Op::Left(n) => writeln!(out, "{:<12} {:<6} ; head", op.name(), n),
        Op::Incr(n) | Op::Decr(n) => writeln!(out, "{:<12} {:<6} ; cell", op.name(), n),
        Op::Output(n) => writeln!(out, "{:<12} {:<6} ; write cell", op.name(), n),
        Op::Input(n) => writeln!(out, "{:<12} {:<6} ; read cell", op.name(), n),
        Op::JumpIfZero(target) => writeln!(out, "{:<12} ↓ {:04}", op.name(), target),
        Op::JumpIfNonZero(target) => writeln!(out, "{:<12} ↑ {:04}", op.name(), target),
    }
}
