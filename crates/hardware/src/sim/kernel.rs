//! Minimal Kernel.
//!
//! The default [`ExceptionHandler`]: enough operating system to run user
//! programs on the simulated machine. It provides:
//! 1. **Program Start:** Creating an address space for an image and setting up
//!    its registers.
//! 2. **Paging:** Page faults are resolved through the [`MemoryManager`] and the
//!    faulting instruction is retried.
//! 3. **System Calls:** `Halt` (code 0) and `Exit` (code 1, status in `a0`).
//! 4. **Termination:** Every other exception ends the running program with
//!    status -1.
//! 5. **Context Switch:** User registers are saved per space, so several
//!    programs can share the machine.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::common::{Exception, RegisterFile, VmError};
use crate::config::{Config, ConfigError};
use crate::core::cpu::{Control, ExceptionHandler, Machine};
use crate::isa::abi::{REG_A0, REG_V0};
use crate::vm::{MemoryManager, SpaceId};

use super::loader::ProgramImage;

/// System call numbers, passed in `v0`.
pub mod syscall {
    /// Stop the machine.
    pub const HALT: u32 = 0;
    /// End the running program with the status in `a0`.
    pub const EXIT: u32 = 1;
}

/// Status reported for programs killed by the kernel.
pub const KILLED_STATUS: i32 = -1;

/// Exception handler implementing paging and the Halt/Exit system calls.
#[derive(Debug)]
pub struct Kernel {
    vm: MemoryManager,
    contexts: BTreeMap<SpaceId, RegisterFile>,
    exit_status: Option<i32>,
}

impl Kernel {
    /// Creates a kernel with no programs.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `config` fails [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            vm: MemoryManager::new(config)?,
            contexts: BTreeMap::new(),
            exit_status: None,
        })
    }

    /// The virtual memory manager.
    pub fn vm(&self) -> &MemoryManager {
        &self.vm
    }

    /// Mutable access to the virtual memory manager.
    pub fn vm_mut(&mut self) -> &mut MemoryManager {
        &mut self.vm
    }

    /// Status of the last program that exited or was killed.
    pub fn exit_status(&self) -> Option<i32> {
        self.exit_status
    }

    /// Creates an address space for `image` and makes it the running program.
    ///
    /// # Errors
    ///
    /// Any failure of address-space creation.
    pub fn exec(&mut self, machine: &mut Machine, image: ProgramImage) -> Result<SpaceId, VmError> {
        let id = self.vm.create_space(machine, image.header, image.store)?;
        let mut regs = RegisterFile::new();
        if let Some(space) = self.vm.space(id) {
            space.init_registers(&mut regs);
        }
        let _ = self.contexts.insert(id, regs);
        self.switch_to(machine, id)?;
        debug!(space = %id, "program started");
        Ok(id)
    }

    /// Makes `id` the running program, saving the registers of the outgoing one.
    ///
    /// # Errors
    ///
    /// [`VmError::UnknownSpace`] if `id` is not a live program.
    pub fn switch_to(&mut self, machine: &mut Machine, id: SpaceId) -> Result<(), VmError> {
        if let Some(current) = self.vm.current() {
            if current == id {
                return Ok(());
            }
            let _ = self.contexts.insert(current, machine.regs.clone());
        }
        let regs = self
            .contexts
            .get(&id)
            .cloned()
            .ok_or(VmError::UnknownSpace(id))?;
        self.vm.restore_state(machine, id)?;
        machine.regs = regs;
        Ok(())
    }

    /// Ends the running program with `status` and halts the machine.
    fn terminate(&mut self, machine: &mut Machine, status: i32) -> Control {
        if let Some(id) = self.vm.current() {
            debug!(space = %id, status, "program terminated");
            self.vm.destroy_space(machine, id);
            let _ = self.contexts.remove(&id);
        }
        self.forget_aborted();
        self.exit_status = Some(status);
        Control::Halt(status)
    }

    fn forget_aborted(&mut self) {
        for id in self.vm.take_aborted() {
            let _ = self.contexts.remove(&id);
        }
    }

    fn system_call(&mut self, machine: &mut Machine) -> Control {
        let code = machine.regs.read(REG_V0);
        match code {
            syscall::HALT => {
                machine.regs.advance_pc();
                debug!("halt requested");
                self.exit_status = Some(0);
                Control::Halt(0)
            }
            syscall::EXIT => {
                machine.regs.advance_pc();
                let status = machine.regs.read(REG_A0) as i32;
                self.terminate(machine, status)
            }
            _ => {
                warn!(code, "unknown system call");
                self.terminate(machine, KILLED_STATUS)
            }
        }
    }
}

impl ExceptionHandler for Kernel {
    fn handle(&mut self, machine: &mut Machine, exception: Exception) -> Control {
        match exception {
            Exception::PageFault(vaddr) => match self.vm.handle_page_fault(machine, vaddr) {
                Ok(()) => Control::Continue,
                Err(err) => {
                    warn!("page fault at {vaddr:#010x} not resolved: {err}");
                    self.forget_aborted();
                    self.exit_status = Some(KILLED_STATUS);
                    Control::Halt(KILLED_STATUS)
                }
            },
            Exception::Syscall => self.system_call(machine),
            other => {
                warn!(pc = format_args!("{:#010x}", machine.regs.pc()), "{other}");
                self.terminate(machine, KILLED_STATUS)
            }
        }
    }
}
