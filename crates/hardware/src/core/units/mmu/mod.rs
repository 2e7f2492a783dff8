//! Memory Management Unit (MMU).
//!
//! This module implements virtual-to-physical address translation. Exactly one
//! translation source is active at a time, chosen by configuration:
//! 1. **Page Table:** a linear table indexed by virtual page number, shared with
//!    the running address space.
//! 2. **TLB:** a small associative cache refilled by the kernel on a miss.
//!
//! Every successful translation sets the entry's `used` bit and, for writes,
//! its `dirty` bit.

/// Translation entry shared by page tables and the TLB.
pub mod entry;

/// Linear page tables.
pub mod page_table;

/// Translation Lookaside Buffer (TLB) for caching virtual-to-physical address translations.
pub mod tlb;

use tracing::debug;

use crate::common::{AccessSize, Exception, PhysAddr, VirtAddr};
use crate::config::{MemoryConfig, TranslationMode};

use self::entry::TranslationEntry;
use self::page_table::PageTable;
use self::tlb::Tlb;

/// Memory Management Unit (MMU) for virtual-to-physical address translation.
#[derive(Debug)]
pub struct Mmu {
    /// Active translation source.
    pub mode: TranslationMode,
    /// Hardware TLB (consulted only in TLB mode).
    pub tlb: Tlb,
    /// Page table of the running address space, if any.
    pub page_table: Option<PageTable>,
    page_size: u32,
    num_frames: u32,
}

impl Mmu {
    /// Creates an MMU for the given memory geometry with no page table installed.
    ///
    /// `config` must already have passed [`crate::config::Config::validate`].
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            mode: config.translation,
            tlb: Tlb::new(config.tlb_size),
            page_table: None,
            page_size: config.page_size,
            num_frames: config.num_phys_pages,
        }
    }

    /// Bytes per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of physical frames.
    pub fn num_frames(&self) -> u32 {
        self.num_frames
    }

    /// Returns `true` in TLB mode.
    pub fn uses_tlb(&self) -> bool {
        self.mode == TranslationMode::Tlb
    }

    /// Translates a virtual address for an access of `size` bytes.
    ///
    /// # Errors
    ///
    /// - [`Exception::AddressError`]: a halfword or word access is misaligned.
    /// - [`Exception::PageFault`]: the page is outside the table, its entry is
    ///   invalid, or (in TLB mode) no valid TLB slot maps it.
    /// - [`Exception::ReadOnly`]: a write through a read-only mapping.
    /// - [`Exception::BusError`]: the mapping names a frame beyond physical memory.
    ///
    /// On error no entry is modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use mipsim_core::common::{AccessSize, Exception, VirtAddr};
    /// use mipsim_core::config::MemoryConfig;
    /// use mipsim_core::core::units::mmu::Mmu;
    /// use mipsim_core::core::units::mmu::entry::TranslationEntry;
    /// use mipsim_core::core::units::mmu::page_table::PageTable;
    ///
    /// let mut mmu = Mmu::new(&MemoryConfig::default());
    /// let table = PageTable::new(2);
    /// table.set(1, TranslationEntry::mapped(1, 5));
    /// mmu.page_table = Some(table.clone());
    ///
    /// let pa = mmu.translate(VirtAddr::new(130), AccessSize::Half, true).unwrap();
    /// assert_eq!(pa.val(), 5 * 128 + 2);
    /// assert!(table.get(1).unwrap().dirty);
    ///
    /// assert_eq!(
    ///     mmu.translate(VirtAddr::new(4), AccessSize::Word, false),
    ///     Err(Exception::PageFault(4))
    /// );
    /// ```
    pub fn translate(
        &mut self,
        vaddr: VirtAddr,
        size: AccessSize,
        writing: bool,
    ) -> Result<PhysAddr, Exception> {
        let va = vaddr.val();
        if !size.is_aligned(va) {
            debug!(vaddr = %vaddr, size = size.bytes(), "unaligned access");
            return Err(Exception::AddressError(va));
        }

        let vpn = vaddr.vpn(self.page_size);
        let offset = vaddr.page_offset(self.page_size);
        let num_frames = self.num_frames;

        let frame = match self.mode {
            TranslationMode::Tlb => {
                let Some(entry) = self.tlb.lookup_mut(vpn) else {
                    debug!(vaddr = %vaddr, vpn, "tlb miss");
                    return Err(Exception::PageFault(va));
                };
                check_and_mark(entry, va, writing, num_frames)?
            }
            TranslationMode::PageTable => {
                let Some(table) = &self.page_table else {
                    return Err(Exception::PageFault(va));
                };
                table
                    .update(vpn, |entry| {
                        if !entry.valid {
                            return Err(Exception::PageFault(va));
                        }
                        check_and_mark(entry, va, writing, num_frames)
                    })
                    .unwrap_or_else(|| {
                        debug!(vaddr = %vaddr, vpn, pages = table.len(), "vpn beyond page table");
                        Err(Exception::PageFault(va))
                    })
                    .inspect_err(|e| debug!(vaddr = %vaddr, vpn, "translation failed: {e}"))?
            }
        };

        Ok(PhysAddr::new(frame * self.page_size + offset))
    }
}

/// Applies the protection checks to a valid entry, then sets `used`/`dirty`.
fn check_and_mark(
    entry: &mut TranslationEntry,
    va: u32,
    writing: bool,
    num_frames: u32,
) -> Result<u32, Exception> {
    if entry.read_only && writing {
        return Err(Exception::ReadOnly(va));
    }
    if entry.physical_page >= num_frames {
        return Err(Exception::BusError(va));
    }
    entry.used = true;
    if writing {
        entry.dirty = true;
    }
    Ok(entry.physical_page)
}
