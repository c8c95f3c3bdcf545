use crate::bytecode::{Op, Program};
use crate::runtime::runtime_error::{
    RuntimeError, input_conversion, memory_overflow, memory_underflow,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace, warn};

/// Highest index the head may reach.
pub const MAX_MEMORY_SIZE: usize = 30_000;

/// Cells allocated before the program starts.
pub const INITIAL_MEMORY: usize = 32;

/// How `,` turns input into a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// One textual integer per read, e.g. a line holding `-42`.
    #[default]
    Integer,
    /// One raw byte per read; end of input stores 0.
    Byte,
}

#[derive(Debug, Clone)]
pub struct VmBcConfig {
    pub max_memory_size: usize,
    pub initial_memory: usize,
    pub input_mode: InputMode,
    pub max_steps: Option<usize>,
    /// Checked once per instruction; set it from another thread to stop the run.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for VmBcConfig {
    fn default() -> Self {
        VmBcConfig {
            max_memory_size: MAX_MEMORY_SIZE,
            initial_memory: INITIAL_MEMORY,
            input_mode: InputMode::Integer,
            max_steps: None,
            cancel: None,
        }
    }
}

impl VmBcConfig {
    pub fn with_max_memory_size(mut self, max: usize) -> Self {
        self.max_memory_size = max;
        self
    }

    pub fn with_initial_memory(mut self, cells: usize) -> Self {
        self.initial_memory = cells;
        self
    }

    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

/// Where `,` gets its values from. Every `BufRead` is one.
pub trait InputSource {
    /// One textual value, without its line terminator. Empty at end of input.
    fn read_value(&mut self) -> io::Result<String>;

    /// One raw byte, `None` at end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<R: BufRead + ?Sized> InputSource for R {
    fn read_value(&mut self) -> io::Result<String> {
        // Decode lossily so invalid UTF-8 fails integer conversion, not the read.
        let mut line = Vec::new();
        self.read_until(b'\n', &mut line)?;
        Ok(String::from_utf8_lossy(&line).trim().to_string())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.fill_buf()?.first().copied();
        if byte.is_some() {
            self.consume(1);
        }
        Ok(byte)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

pub struct VmBc<'p> {
    program: &'p Program,
    memory: Vec<i64>,
    head: usize,
    ip: usize,
    steps: usize,
    config: VmBcConfig,
}

impl<'p> VmBc<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self::with_config(program, VmBcConfig::default())
    }

    pub fn with_config(program: &'p Program, config: VmBcConfig) -> Self {
        Self {
            program,
            memory: vec![0; config.initial_memory.max(1)],
            head: 0,
            ip: 0,
            steps: 0,
            config,
        }
    }

    pub fn memory(&self) -> &[i64] {
        &self.memory
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.ip >= self.program.len()
    }

    /// Rewinds to the initial machine state so the program can run again.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.memory.resize(self.config.initial_memory.max(1), 0);
        self.head = 0;
        self.ip = 0;
        self.steps = 0;
    }

    /// Runs until the program ends or fails. The output is flushed either way.
    pub fn run<I, W>(&mut self, input: &mut I, output: &mut W) -> Result<(), RuntimeError>
    where
        I: InputSource + ?Sized,
        W: Write + ?Sized,
    {
        debug!(ops = self.program.len(), "run started");

        let result = self.run_inner(input, output);
        let flushed = output.flush();

        match result {
            Ok(()) => {
                flushed?;
                debug!(steps = self.steps, head = self.head, "run finished");
                Ok(())
            }
            Err(e) => {
                warn!(ip = self.ip, head = self.head, error = %e, "run failed");
                Err(e)
            }
        }
    }

    fn run_inner<I, W>(&mut self, input: &mut I, output: &mut W) -> Result<(), RuntimeError>
    where
        I: InputSource + ?Sized,
        W: Write + ?Sized,
    {
        while self.step(input, output)? == StepOutcome::Continue {}
        Ok(())
    }

    // Execution

    fn check_limits(&mut self) -> Result<(), RuntimeError> {
        if let Some(flag) = &self.config.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(RuntimeError::Cancelled);
            }
        }

        self.steps += 1;

        if let Some(max) = self.config.max_steps {
            if self.steps > max {
                return Err(RuntimeError::StepLimitExceeded(max));
            }
        }

        Ok(())
    }

    /// Executes one instruction. Returns `Halted` once the instruction
    /// pointer has run off the end of the program.
    pub fn step<I, W>(&mut self, input: &mut I, output: &mut W) -> Result<StepOutcome, RuntimeError>
    where
        I: InputSource + ?Sized,
        W: Write + ?Sized,
    {
        let Some(&op) = self.program.get(self.ip) else {
            return Ok(StepOutcome::Halted);
        };

        self.check_limits()?;

        match op {
            Op::Right(n) => {
                let head = self.head.saturating_add(n);
                if head > self.config.max_memory_size {
                    return Err(memory_overflow(head, self.config.max_memory_size));
                }
                if head >= self.memory.len() {
                    trace!(from = self.memory.len(), to = head + 1, "growing memory");
                    self.memory.resize(head + 1, 0);
                }
                self.head = head;
                self.ip += 1;
            }
            Op::Left(n) => {
                self.head = self
                    .head
                    .checked_sub(n)
                    .ok_or_else(|| memory_underflow(self.head, n))?;
                self.ip += 1;
            }
            Op::Incr(n) => {
                let cell = self.cell_mut();
                *cell = cell.wrapping_add(n as i64);
                self.ip += 1;
            }
            Op::Decr(n) => {
                let cell = self.cell_mut();
                *cell = cell.wrapping_sub(n as i64);
                self.ip += 1;
            }
            Op::Output(n) => {
                let mut buf = [0u8; 4];
                let encoded = cell_to_char(self.cell()).encode_utf8(&mut buf);
                for _ in 0..n {
                    output.write_all(encoded.as_bytes())?;
                }
                self.ip += 1;
            }
            Op::Input(n) => {
                for _ in 0..n {
                    let value = self.read_input(input)?;
                    *self.cell_mut() = value;
                }
                self.ip += 1;
            }
            Op::JumpIfZero(target) => {
                self.ip = if self.cell() == 0 { target } else { self.ip + 1 };
            }
            Op::JumpIfNonZero(target) => {
                self.ip = if self.cell() != 0 { target } else { self.ip + 1 };
            }
        }

        Ok(if self.is_halted() {
            StepOutcome::Halted
        } else {
            StepOutcome::Continue
        })
    }

    fn read_input<I: InputSource + ?Sized>(&self, input: &mut I) -> Result<i64, RuntimeError> {
        match self.config.input_mode {
            InputMode::Integer => {
                let raw = input.read_value()?;
                raw.parse::<i64>().map_err(|_| input_conversion(raw))
            }
            InputMode::Byte => Ok(input.read_byte()?.map_or(0, i64::from)),
        }
    }

    // Memory helpers

    fn cell(&self) -> i64 {
        self.memory[self.head]
    }

    fn cell_mut(&mut self) -> &mut i64 {
        &mut self.memory[self.head]
    }
}

/// Cells are Unicode scalar values on output; anything else prints as U+FFFD.
fn cell_to_char(value: i64) -> char {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
