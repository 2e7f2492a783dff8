//! Machine Definition and Initialization.
//!
//! This module defines the central `Machine` structure, the explicit context
//! object that bundles the entire simulated hardware state. It coordinates the
//! following:
//! 1. **State Management:** The 40-register file, including the program counters
//!    and the pending delayed load.
//! 2. **Memory:** Physical memory and the MMU (page table or TLB translation).
//! 3. **Execution:** One-instruction stepping and the exception-driven run loop.
//! 4. **Observability:** Statistics and optional instruction tracing.
//!
//! Several machines can coexist; nothing here is global.

/// Single-instruction execution.
pub mod execution;

/// Virtual memory access on behalf of the kernel and the engine.
pub mod memory;

/// Exception delivery and the run loop.
pub mod trap;

use crate::common::RegisterFile;
use crate::config::{Config, ConfigError};
use crate::core::units::mmu::Mmu;
use crate::soc::PhysicalMemory;
use crate::stats::SimStats;

pub use self::trap::{Control, ExceptionHandler, StopReason};

/// The simulated machine.
#[derive(Debug)]
pub struct Machine {
    /// User-visible registers.
    pub regs: RegisterFile,
    /// Main memory.
    pub memory: PhysicalMemory,
    /// Address translation hardware.
    pub mmu: Mmu,
    /// Run statistics.
    pub stats: SimStats,
    /// Log every executed instruction at trace level.
    pub trace: bool,
    /// Tick budget for [`Machine::run`].
    pub max_ticks: u64,
}

impl Machine {
    /// Creates a machine with zeroed memory and registers.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `config` fails [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            regs: RegisterFile::new(),
            memory: PhysicalMemory::new(config.memory.page_size, config.memory.num_phys_pages),
            mmu: Mmu::new(&config.memory),
            stats: SimStats::default(),
            trace: config.general.trace_instructions,
            max_ticks: config.general.max_ticks,
        })
    }

    /// Reads one of the 40 machine registers.
    pub fn read_register(&self, idx: usize) -> u32 {
        self.regs.read(idx)
    }

    /// Writes one of the 40 machine registers. Writes to register 0 are ignored.
    pub fn write_register(&mut self, idx: usize, value: u32) {
        self.regs.write(idx, value);
    }

    /// Bytes per page.
    pub fn page_size(&self) -> u32 {
        self.mmu.page_size()
    }

    /// Number of physical frames.
    pub fn num_frames(&self) -> u32 {
        self.mmu.num_frames()
    }

    /// Dumps the register state to stdout.
    pub fn dump_state(&self) {
        self.regs.dump();
    }
}
