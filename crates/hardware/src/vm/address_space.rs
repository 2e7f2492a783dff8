//! Address Spaces.
//!
//! An address space is one program's view of memory: a linear page table, the
//! program image it was created from and, under the swapping policy, a private
//! swap store. This module holds the per-space operations that need no other
//! space and no frame allocator:
//! 1. **Geometry:** size in pages (code + data + bss + stack, rounded up).
//! 2. **Page Loading:** filling one frame from the executable, zero-fill, or swap.
//! 3. **Swapping:** moving one page to and from the swap store.
//! 4. **Startup:** initial register values.
//!
//! Frame allocation, eviction and context switching span spaces and live in
//! [`super::MemoryManager`].

use std::fmt;

use tracing::trace;

use crate::common::constants::{NEXT_PC_REG, PC_REG, STACK_GUARD, STACK_REG};
use crate::common::{RegisterFile, VmError};
use crate::config::LoadPolicy;
use crate::core::units::mmu::page_table::PageTable;
use crate::sim::noff::{NoffHeader, Segment};

use super::SpaceId;
use super::store::{BackingStore, read_full, write_full};

/// Which part of the program image a virtual address falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    /// Program text.
    Code,
    /// Initialised data.
    InitData,
    /// Uninitialised data.
    UninitData,
    /// Anything else inside the space, mostly the user stack.
    Stack,
}

/// Where the contents of a freshly loaded page came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSource {
    /// Copied from the executable (and zero-filled around the segment bytes).
    Executable,
    /// Zero-filled only.
    Zero,
    /// Read back from the swap store.
    Swap,
}

/// One program's address space.
pub struct AddressSpace {
    id: SpaceId,
    page_table: PageTable,
    num_pages: u32,
    page_size: u32,
    header: NoffHeader,
    executable: Box<dyn BackingStore>,
    swap: Option<Box<dyn BackingStore>>,
    in_swap: Vec<bool>,
    policy: LoadPolicy,
}

impl AddressSpace {
    /// Creates a space whose page table has every entry invalid.
    ///
    /// No frames are claimed here; loading is the manager's job.
    ///
    /// # Errors
    ///
    /// [`VmError::TooLarge`] if the space would not fit in 32-bit addresses.
    pub fn new(
        id: SpaceId,
        header: NoffHeader,
        executable: Box<dyn BackingStore>,
        swap: Option<Box<dyn BackingStore>>,
        policy: LoadPolicy,
        page_size: u32,
        stack_size: u32,
    ) -> Result<Self, VmError> {
        let num_pages = Self::pages_needed(&header, page_size, stack_size).ok_or_else(|| {
            VmError::TooLarge {
                space: id,
                bytes: Self::bytes_needed(&header, stack_size),
            }
        })?;
        Ok(Self {
            id,
            page_table: PageTable::new(num_pages),
            num_pages,
            page_size,
            header,
            executable,
            swap,
            in_swap: vec![false; num_pages as usize],
            policy,
        })
    }

    /// Bytes needed for the image segments plus a stack of `stack_size` bytes.
    pub fn bytes_needed(header: &NoffHeader, stack_size: u32) -> u64 {
        u64::from(header.code.size)
            + u64::from(header.init_data.size)
            + u64::from(header.uninit_data.size)
            + u64::from(stack_size)
    }

    /// Pages needed for the image plus a stack of `stack_size` bytes.
    ///
    /// Returns `None` when the space, rounded up to whole pages, is not
    /// addressable with 32 bits.
    pub fn pages_needed(header: &NoffHeader, page_size: u32, stack_size: u32) -> Option<u32> {
        if page_size == 0 {
            return None;
        }
        let pages = Self::bytes_needed(header, stack_size).div_ceil(u64::from(page_size));
        u32::try_from(pages)
            .ok()
            .filter(|&pages| pages.checked_mul(page_size).is_some())
    }

    /// Identifier of this space.
    pub fn id(&self) -> SpaceId {
        self.id
    }

    /// Handle to this space's page table.
    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    /// Number of virtual pages.
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Size of the space in bytes.
    pub fn size(&self) -> u32 {
        self.num_pages * self.page_size
    }

    /// Loading policy the space was created with.
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Program header the space was created from.
    pub fn header(&self) -> &NoffHeader {
        &self.header
    }

    /// Returns `true` if the space has a swap store.
    pub fn has_swap(&self) -> bool {
        self.swap.is_some()
    }

    /// Returns `true` if the swap store holds the current contents of `vpn`.
    pub fn is_in_swap(&self, vpn: u32) -> bool {
        self.in_swap.get(vpn as usize).copied().unwrap_or(false)
    }

    /// Sets up the registers for the first instruction of the program.
    ///
    /// Everything is zero except `NEXT_PC` (4) and the stack pointer, which
    /// sits just below the top of the space.
    pub fn init_registers(&self, regs: &mut RegisterFile) {
        *regs = RegisterFile::new();
        regs.write(PC_REG, 0);
        regs.write(NEXT_PC_REG, 4);
        regs.write(STACK_REG, self.size().wrapping_sub(STACK_GUARD));
    }

    /// Classifies `vaddr` by range containment in the image segments.
    pub fn region_of(&self, vaddr: u32) -> Region {
        let h = &self.header;
        if h.code.contains(vaddr) {
            Region::Code
        } else if h.init_data.contains(vaddr) {
            Region::InitData
        } else if h.uninit_data.contains(vaddr) {
            Region::UninitData
        } else {
            Region::Stack
        }
    }

    /// Fills `frame` with the contents of virtual page `vpn`.
    ///
    /// Pages that were written to swap come back from swap. Otherwise the
    /// frame is zeroed and the bytes of the code and initialised-data segments
    /// that fall inside the page are copied in from the executable, at
    /// `file offset + (page start - segment start)`.
    ///
    /// # Errors
    ///
    /// [`VmError::OutOfRange`] for a page past the end of the space, or the
    /// I/O failure of the executable or swap store.
    pub fn load_page(&mut self, vpn: u32, frame: &mut [u8]) -> Result<PageSource, VmError> {
        if vpn >= self.num_pages {
            return Err(VmError::OutOfRange {
                space: self.id,
                vaddr: vpn.wrapping_mul(self.page_size),
            });
        }
        if self.is_in_swap(vpn) {
            self.load_from_swap(vpn, frame)?;
            return Ok(PageSource::Swap);
        }

        frame.fill(0);
        let page_start = vpn * self.page_size;
        let region = self.region_of(page_start);
        let mut copied = false;
        for segment in [self.header.code, self.header.init_data] {
            copied |= self.copy_segment_part(&segment, vpn, page_start, frame)?;
        }
        trace!(space = %self.id, vpn, ?region, copied, "page loaded");
        Ok(if copied {
            PageSource::Executable
        } else {
            PageSource::Zero
        })
    }

    fn copy_segment_part(
        &mut self,
        segment: &Segment,
        vpn: u32,
        page_start: u32,
        frame: &mut [u8],
    ) -> Result<bool, VmError> {
        let page_end = page_start + frame.len() as u32;
        let start = segment.virtual_addr.max(page_start);
        let end = segment.end().min(page_end);
        if segment.size == 0 || start >= end {
            return Ok(false);
        }
        let file_offset = u64::from(segment.in_file_addr) + u64::from(start - segment.virtual_addr);
        let dst = &mut frame[(start - page_start) as usize..(end - page_start) as usize];
        read_full(self.executable.as_mut(), dst, file_offset).map_err(|source| {
            VmError::Executable {
                space: self.id,
                vpn,
                source,
            }
        })?;
        Ok(true)
    }

    /// Writes the contents of page `vpn` to the swap store.
    ///
    /// # Errors
    ///
    /// [`VmError::NoSwap`] if the space has no swap store, or the I/O failure.
    pub fn save_to_swap(&mut self, vpn: u32, data: &[u8]) -> Result<(), VmError> {
        let id = self.id;
        let Some(swap) = self.swap.as_mut() else {
            return Err(VmError::NoSwap { space: id, vpn });
        };
        let offset = u64::from(vpn) * u64::from(self.page_size);
        write_full(swap.as_mut(), data, offset).map_err(|source| VmError::Swap {
            space: id,
            vpn,
            source,
        })?;
        if let Some(flag) = self.in_swap.get_mut(vpn as usize) {
            *flag = true;
        }
        Ok(())
    }

    /// Reads page `vpn` back from the swap store into `frame`.
    ///
    /// # Errors
    ///
    /// [`VmError::NoSwap`] if the space has no swap store, or the I/O failure.
    pub fn load_from_swap(&mut self, vpn: u32, frame: &mut [u8]) -> Result<(), VmError> {
        let id = self.id;
        let Some(swap) = self.swap.as_mut() else {
            return Err(VmError::NoSwap { space: id, vpn });
        };
        let offset = u64::from(vpn) * u64::from(self.page_size);
        read_full(swap.as_mut(), frame, offset).map_err(|source| VmError::Swap {
            space: id,
            vpn,
            source,
        })
    }
}

impl fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressSpace")
            .field("id", &self.id)
            .field("num_pages", &self.num_pages)
            .field("policy", &self.policy)
            .field("swap", &self.swap.is_some())
            .field("page_table", &self.page_table)
            .finish_non_exhaustive()
    }
}
