//! # Tape
//!
//! A compiler and bytecode VM for the eight-command tape language
//! (`>` `<` `+` `-` `.` `,` `[` `]`).
//!
//! The pipeline runs one way:
//!
//! - [`frontend::lexer::Lexer`] scans bytes into command tokens, treating
//!   every other byte as a comment.
//! - [`bytecode::compile::Compiler`] folds runs of identical commands into
//!   counted ops and resolves every loop to absolute jump targets.
//! - [`runtime::VmBc`] executes the resulting [`Program`] over a growable
//!   tape of `i64` cells.
//!
//! Reading files and parsing command lines are left to the host.

pub mod bytecode;
pub mod frontend;
pub mod runtime;

use std::io::Write;

use thiserror::Error;

pub use bytecode::compile_error::CompileError;
pub use bytecode::{Op, Program};
pub use frontend::token::{COMMANDS, Span};
pub use runtime::vm_bc::{INITIAL_MEMORY, MAX_MEMORY_SIZE};
pub use runtime::{InputMode, InputSource, RuntimeError, StepOutcome, VmBc, VmBcConfig};

use bytecode::compile::Compiler;
use frontend::lexer::Lexer;

/// Either stage of [`run`] failing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Compiles source bytes into a jump-resolved program.
pub fn compile(source: &[u8]) -> Result<Program, CompileError> {
    Compiler::new(Lexer::new(source)).compile()
}

/// Compiles and runs `source` with the default configuration.
pub fn run<I, W>(source: &[u8], input: &mut I, output: &mut W) -> Result<(), Error>
where
    I: InputSource + ?Sized,
    W: Write + ?Sized,
{
    run_with_config(source, VmBcConfig::default(), input, output)
}

/// Compiles and runs `source` with an explicit VM configuration.
pub fn run_with_config<I, W>(
    source: &[u8],
    config: VmBcConfig,
    input: &mut I,
    output: &mut W,
) -> Result<(), Error>
where
    I: InputSource + ?Sized,
    W: Write + ?Sized,
{
    let program = compile(source)?;
    VmBc::with_config(&program, config).run(input, output)?;
    Ok(())
}
