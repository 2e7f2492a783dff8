//! Memory Access Helpers.
//!
//! This module provides the interface between the machine and the memory
//! subsystem. It performs the following:
//! 1. **Address Translation:** Forwards virtual addresses to the MMU.
//! 2. **Kernel Access:** `read_mem`/`write_mem`, the checked accessors the
//!    kernel uses to move data in and out of user memory.
//!
//! A failing access records the exception: `BAD_VADDR` receives the faulting
//! address and the per-kind counter is bumped. The caller decides what to do
//! with the returned [`Exception`].

use super::Machine;
use crate::common::constants::BAD_VADDR_REG;
use crate::common::{AccessSize, Exception, PhysAddr, VirtAddr};

impl Machine {
    /// Translates a virtual address through the active translation source.
    ///
    /// # Errors
    ///
    /// Whatever exception the MMU raises for the access.
    #[inline]
    pub fn translate(
        &mut self,
        vaddr: u32,
        size: AccessSize,
        writing: bool,
    ) -> Result<PhysAddr, Exception> {
        self.mmu.translate(VirtAddr::new(vaddr), size, writing)
    }

    /// Reads `size` bytes (1, 2 or 4) of user memory at `vaddr`.
    ///
    /// The value is zero-extended from its little-endian memory image.
    ///
    /// # Errors
    ///
    /// Any translation exception, or [`Exception::AddressError`] for an
    /// unsupported size. `BAD_VADDR` holds `vaddr` afterwards.
    pub fn read_mem(&mut self, vaddr: u32, size: u32) -> Result<u32, Exception> {
        let result = AccessSize::from_bytes(size, vaddr).and_then(|size| {
            let pa = self.translate(vaddr, size, false)?;
            Ok(self.memory.read(pa, size))
        });
        result.inspect_err(|&e| self.record_fault(e))
    }

    /// Writes the low `size` bytes (1, 2 or 4) of `value` to user memory at `vaddr`.
    ///
    /// # Errors
    ///
    /// Any translation exception, or [`Exception::AddressError`] for an
    /// unsupported size. Memory is untouched on failure.
    pub fn write_mem(&mut self, vaddr: u32, size: u32, value: u32) -> Result<(), Exception> {
        let result = AccessSize::from_bytes(size, vaddr).and_then(|size| {
            let pa = self.translate(vaddr, size, true)?;
            self.memory.write(pa, size, value);
            Ok(())
        });
        result.inspect_err(|&e| self.record_fault(e))
    }

    fn record_fault(&mut self, exception: Exception) {
        self.regs.write(BAD_VADDR_REG, exception.bad_vaddr());
        self.stats.record_exception(exception.kind());
    }
}
