//! Physical and Virtual Address types.
//!
//! This module defines strong types for physical and virtual addresses to prevent
//! accidental mixing of address spaces. It provides the following:
//! 1. **Type Safety:** Distinguishes user (virtual) addresses from offsets into main memory.
//! 2. **Page Arithmetic:** Splits an address into page number and offset for a given page size.

use std::fmt;

/// A virtual address generated by a user program.
///
/// Virtual addresses must be translated through the MMU (linear page table or
/// TLB) before they can touch physical memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u32);

/// A physical address: a byte offset into the machine's main memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u32);

impl VirtAddr {
    /// Creates a new virtual address from a raw 32-bit value.
    #[inline(always)]
    pub fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub fn val(self) -> u32 {
        self.0
    }

    /// Returns the virtual page number of this address.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Page size in bytes.
    #[inline(always)]
    pub fn vpn(self, page_size: u32) -> u32 {
        self.0 / page_size
    }

    /// Returns the byte offset of this address within its page.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Page size in bytes.
    #[inline(always)]
    pub fn page_offset(self, page_size: u32) -> u32 {
        self.0 % page_size
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 32-bit value.
    #[inline(always)]
    pub fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub fn val(self) -> u32 {
        self.0
    }

    /// Returns the address as an index into main memory.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
