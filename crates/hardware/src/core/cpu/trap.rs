//! Exception Delivery and the Run Loop.
//!
//! This module connects the machine to the kernel. It performs the following:
//! 1. **Trap State:** Raising an exception retires the pending delayed load and
//!    records the faulting address in `BAD_VADDR`.
//! 2. **Dispatch:** Every exception is handed whole to an [`ExceptionHandler`],
//!    which resolves it (and sets `PC`/`NEXT_PC` if execution is to move on)
//!    or stops the machine.
//! 3. **Run Loop:** [`Machine::run`] steps instructions until the handler
//!    halts or the tick budget runs out.

use tracing::{debug, warn};

use super::Machine;
use crate::common::Exception;
use crate::common::constants::BAD_VADDR_REG;

/// What the machine does after an exception has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Resume at the current `PC`.
    Continue,
    /// Stop the run loop with the given exit status.
    Halt(i32),
}

/// Why [`Machine::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The handler halted the machine.
    Halted(i32),
    /// `max_ticks` ticks elapsed.
    TickLimit,
}

/// Receives every exception the machine raises.
///
/// The handler owns recovery: it may resolve a page fault and return
/// [`Control::Continue`] to retry the same instruction, advance the program
/// counters past a system call, or halt.
pub trait ExceptionHandler {
    /// Handles `exception` raised by the instruction at the current `PC`.
    fn handle(&mut self, machine: &mut Machine, exception: Exception) -> Control;
}

impl<F> ExceptionHandler for F
where
    F: FnMut(&mut Machine, Exception) -> Control,
{
    fn handle(&mut self, machine: &mut Machine, exception: Exception) -> Control {
        self(machine, exception)
    }
}

impl Machine {
    /// Puts the machine into the trap state for `exception`.
    ///
    /// Retires the pending delayed load, stores the faulting address in
    /// `BAD_VADDR` and counts the exception. Program counters are untouched.
    pub fn raise_exception(&mut self, exception: Exception) {
        debug!(pc = format_args!("{:#010x}", self.regs.pc()), "{exception}");
        self.regs.write(BAD_VADDR_REG, exception.bad_vaddr());
        self.regs.delayed_load(0, 0);
        self.stats.record_exception(exception.kind());
    }

    /// Runs instructions until `handler` halts the machine or the tick budget is spent.
    pub fn run<H>(&mut self, handler: &mut H) -> StopReason
    where
        H: ExceptionHandler + ?Sized,
    {
        loop {
            if self.stats.total_ticks >= self.max_ticks {
                warn!(ticks = self.stats.total_ticks, "tick limit reached");
                return StopReason::TickLimit;
            }
            if let Err(exception) = self.one_instruction()
                && let Control::Halt(code) = handler.handle(self, exception)
            {
                return StopReason::Halted(code);
            }
        }
    }
}
