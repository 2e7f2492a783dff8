//! Exception and Error definitions.
//!
//! This module defines the failure vocabulary of the simulator. It provides:
//! 1. **Exceptions:** The architectural exceptions raised by translation and execution,
//!    always handed whole to the kernel's exception handler.
//! 2. **Paging Errors:** Failures of the kernel-side paging layer, each attributed to the
//!    address space that must be aborted because of it.
//! 3. **Load Errors:** Problems with a program image before any space exists.

use std::io;

use thiserror::Error;

use crate::vm::SpaceId;

/// Architectural exceptions raised by the machine.
///
/// The payload of the memory-related variants is the failing virtual
/// address, which the machine stores in `BAD_VADDR_REG` when the exception
/// is raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Exception {
    /// A program executed a system call.
    #[error("system call")]
    Syscall,

    /// No valid translation was found (page table miss or TLB miss).
    #[error("page fault at {0:#010x}")]
    PageFault(u32),

    /// A write was attempted to a page marked read-only.
    #[error("write to read-only page at {0:#010x}")]
    ReadOnly(u32),

    /// Translation produced a frame outside physical memory.
    #[error("bus error at {0:#010x}")]
    BusError(u32),

    /// Unaligned reference, or one outside the address space.
    #[error("address error at {0:#010x}")]
    AddressError(u32),

    /// Signed integer overflow in `add`, `addi` or `sub`.
    #[error("arithmetic overflow")]
    Overflow,

    /// Unimplemented or reserved instruction; carries the raw encoding.
    #[error("illegal instruction {0:#010x}")]
    IllegalInstruction(u32),
}

/// Field-less classification of an [`Exception`], used for statistics and dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExceptionKind {
    /// See [`Exception::Syscall`].
    Syscall,
    /// See [`Exception::PageFault`].
    PageFault,
    /// See [`Exception::ReadOnly`].
    ReadOnly,
    /// See [`Exception::BusError`].
    BusError,
    /// See [`Exception::AddressError`].
    AddressError,
    /// See [`Exception::Overflow`].
    Overflow,
    /// See [`Exception::IllegalInstruction`].
    IllegalInstruction,
}

impl ExceptionKind {
    /// Number of distinct exception kinds.
    pub const COUNT: usize = 7;

    /// Dense index of this kind, for per-kind counters.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Exception {
    /// Returns the classification of this exception.
    pub fn kind(self) -> ExceptionKind {
        match self {
            Self::Syscall => ExceptionKind::Syscall,
            Self::PageFault(_) => ExceptionKind::PageFault,
            Self::ReadOnly(_) => ExceptionKind::ReadOnly,
            Self::BusError(_) => ExceptionKind::BusError,
            Self::AddressError(_) => ExceptionKind::AddressError,
            Self::Overflow => ExceptionKind::Overflow,
            Self::IllegalInstruction(_) => ExceptionKind::IllegalInstruction,
        }
    }

    /// Returns the value the machine stores in `BAD_VADDR_REG` for this exception.
    ///
    /// Exceptions that are not tied to a memory reference report zero.
    pub fn bad_vaddr(self) -> u32 {
        match self {
            Self::PageFault(addr)
            | Self::ReadOnly(addr)
            | Self::BusError(addr)
            | Self::AddressError(addr) => addr,
            Self::Syscall | Self::Overflow | Self::IllegalInstruction(_) => 0,
        }
    }
}

/// Failures of the paging layer.
///
/// None of these are recoverable for the affected address space; the kernel
/// aborts the space named by [`VmError::space`] and keeps the machine running.
#[derive(Debug, Error)]
pub enum VmError {
    /// Reading or writing the swap store failed.
    #[error("swap I/O failed for space {space} page {vpn}: {source}")]
    Swap {
        /// Owner of the page.
        space: SpaceId,
        /// Virtual page being moved.
        vpn: u32,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading the backing executable failed.
    #[error("executable I/O failed for space {space} page {vpn}: {source}")]
    Executable {
        /// Owner of the page.
        space: SpaceId,
        /// Virtual page being loaded.
        vpn: u32,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A dirty page had to be evicted but its space has no swap store.
    #[error("space {space} has no swap store for dirty page {vpn}")]
    NoSwap {
        /// Owner of the page.
        space: SpaceId,
        /// Virtual page that would have been lost.
        vpn: u32,
    },

    /// The address lies beyond the end of the address space.
    #[error("address {vaddr:#010x} is outside space {space}")]
    OutOfRange {
        /// Space that faulted.
        space: SpaceId,
        /// Faulting virtual address.
        vaddr: u32,
    },

    /// Not enough free frames to load a space eagerly.
    #[error("space {space} needs {needed} frames but only {free} are free")]
    OutOfMemory {
        /// Space being created.
        space: SpaceId,
        /// Frames required.
        needed: u32,
        /// Frames available.
        free: u32,
    },

    /// Code, data, bss and stack together exceed the 32-bit address space.
    #[error("space {space} needs {bytes} bytes, more than a 32-bit address space holds")]
    TooLarge {
        /// Space being created.
        space: SpaceId,
        /// Bytes required before rounding to pages.
        bytes: u64,
    },

    /// The id does not name a live address space.
    #[error("no such address space: {0}")]
    UnknownSpace(SpaceId),
}

impl VmError {
    /// Returns the address space that must be aborted because of this error.
    pub fn space(&self) -> SpaceId {
        match self {
            Self::Swap { space, .. }
            | Self::Executable { space, .. }
            | Self::NoSwap { space, .. }
            | Self::OutOfRange { space, .. }
            | Self::OutOfMemory { space, .. }
            | Self::TooLarge { space, .. } => *space,
            Self::UnknownSpace(space) => *space,
        }
    }
}

/// Problems with a program image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The header's magic number matches neither byte order.
    #[error("bad NOFF magic {0:#010x}")]
    BadMagic(u32),

    /// The image is shorter than its header.
    #[error("image truncated: header needs {needed} bytes, got {got}")]
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        got: usize,
    },

    /// A segment descriptor holds a negative or overflowing value.
    #[error("malformed {segment} segment descriptor")]
    BadSegment {
        /// Segment name.
        segment: &'static str,
    },

    /// Reading the image failed.
    #[error("cannot read program image: {0}")]
    Io(#[from] io::Error),
}
