//! The bytecode virtual machine and its errors.

pub mod runtime_error;
pub mod vm_bc;

pub use runtime_error::RuntimeError;
pub use vm_bc::{InputMode, InputSource, StepOutcome, VmBc, VmBcConfig};
