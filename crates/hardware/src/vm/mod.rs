//! Virtual Memory Management.
//!
//! This module implements the kernel side of paging. It provides:
//! 1. **Space Registry:** Address spaces are owned here and named by [`SpaceId`];
//!    nothing else holds a reference to a space.
//! 2. **Frame Allocation:** [`MemoryManager::find_frame`] claims a free frame or
//!    evicts a clock-selected victim, writing it to swap if dirty.
//! 3. **Fault Resolution:** Page faults bring pages in from the executable,
//!    zero-fill or swap; in TLB mode the entry is then loaded into the TLB.
//! 4. **Context Switch:** Folding TLB state back into the outgoing page table
//!    and installing the incoming one.
//!
//! A failure while moving a page aborts only the address space that owns it.

/// Per-space page loading and swapping.
pub mod address_space;

/// Physical frame table and clock victim selection.
pub mod coremap;

/// Random-access backing stores for executables and swap.
pub mod store;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::common::VmError;
use crate::config::{Config, ConfigError, LoadPolicy};
use crate::core::cpu::Machine;
use crate::core::units::mmu::entry::TranslationEntry;
use crate::core::units::mmu::page_table::PageTable;
use crate::core::units::mmu::tlb::Tlb;
use crate::sim::noff::NoffHeader;

use self::address_space::{AddressSpace, PageSource};
use self::coremap::{Coremap, FrameOwner, ReferenceBits};
use self::store::{BackingStore, FileStore, MemStore};

/// Opaque identifier of an address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpaceId(u32);

impl SpaceId {
    /// Wraps a raw identifier.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner of every address space and of the physical frame table.
pub struct MemoryManager {
    spaces: BTreeMap<SpaceId, AddressSpace>,
    coremap: Coremap,
    current: Option<SpaceId>,
    next_id: u32,
    aborted: Vec<SpaceId>,
    policy: LoadPolicy,
    page_size: u32,
    stack_size: u32,
    swap_dir: Option<PathBuf>,
}

impl MemoryManager {
    /// Creates a manager with every frame free.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `config` fails [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            spaces: BTreeMap::new(),
            coremap: Coremap::new(config.memory.num_phys_pages),
            current: None,
            next_id: 1,
            aborted: Vec::new(),
            policy: config.paging.policy,
            page_size: config.memory.page_size,
            stack_size: config.paging.user_stack_size,
            swap_dir: config.paging.swap_dir.clone(),
        })
    }

    /// Page loading policy.
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// The frame table.
    pub fn coremap(&self) -> &Coremap {
        &self.coremap
    }

    /// Looks up a live space.
    pub fn space(&self, id: SpaceId) -> Option<&AddressSpace> {
        self.spaces.get(&id)
    }

    /// Space whose page table is installed in the MMU.
    pub fn current(&self) -> Option<SpaceId> {
        self.current
    }

    /// Returns and clears the list of spaces aborted since the last call.
    pub fn take_aborted(&mut self) -> Vec<SpaceId> {
        std::mem::take(&mut self.aborted)
    }

    /// Creates an address space for a program image.
    ///
    /// Under the swapping policy the space gets a swap store: a file
    /// `SWAP.<id>` in the configured swap directory, or memory otherwise.
    ///
    /// # Errors
    ///
    /// See [`MemoryManager::create_space_with_swap`]; creating the swap file
    /// can also fail with [`VmError::Swap`].
    pub fn create_space(
        &mut self,
        machine: &mut Machine,
        header: NoffHeader,
        executable: Box<dyn BackingStore>,
    ) -> Result<SpaceId, VmError> {
        let id = SpaceId::new(self.next_id);
        if AddressSpace::pages_needed(&header, self.page_size, self.stack_size).is_none() {
            return Err(VmError::TooLarge {
                space: id,
                bytes: AddressSpace::bytes_needed(&header, self.stack_size),
            });
        }
        let swap: Option<Box<dyn BackingStore>> = if self.policy.uses_swap() {
            match &self.swap_dir {
                Some(dir) => {
                    let store = FileStore::create(dir.join(format!("SWAP.{id}")))
                        .map_err(|source| VmError::Swap {
                            space: id,
                            vpn: 0,
                            source,
                        })?;
                    Some(Box::new(store))
                }
                None => Some(Box::new(MemStore::new())),
            }
        } else {
            None
        };
        self.create_space_with_swap(machine, header, executable, swap)
    }

    /// Creates an address space with an explicit swap store.
    ///
    /// Under the eager policy every page is loaded immediately; otherwise the
    /// page table starts out all invalid.
    ///
    /// # Errors
    ///
    /// [`VmError::TooLarge`] when the space is not addressable with 32 bits,
    /// [`VmError::OutOfMemory`] when an eager space does not fit in the free
    /// frames, or the executable's I/O failure.
    pub fn create_space_with_swap(
        &mut self,
        machine: &mut Machine,
        header: NoffHeader,
        executable: Box<dyn BackingStore>,
        swap: Option<Box<dyn BackingStore>>,
    ) -> Result<SpaceId, VmError> {
        let id = SpaceId::new(self.next_id);
        self.next_id += 1;
        let space = AddressSpace::new(
            id,
            header,
            executable,
            swap,
            self.policy,
            self.page_size,
            self.stack_size,
        )?;
        debug!(space = %id, pages = space.num_pages(), policy = ?self.policy, "address space created");
        let num_pages = space.num_pages();
        let _ = self.spaces.insert(id, space);

        if self.policy == LoadPolicy::Eager {
            let free = self.coremap.free_count() as u32;
            if free < num_pages {
                let _ = self.spaces.remove(&id);
                return Err(VmError::OutOfMemory {
                    space: id,
                    needed: num_pages,
                    free,
                });
            }
            for vpn in 0..num_pages {
                if let Err(err) = self.page_in(machine, id, vpn) {
                    self.destroy_space(machine, id);
                    return Err(err);
                }
            }
        }
        Ok(id)
    }

    /// Destroys a space and returns its frames to the free pool.
    ///
    /// TLB copies of its mappings are dropped, and if it was the current space
    /// its page table is uninstalled.
    pub fn destroy_space(&mut self, machine: &mut Machine, id: SpaceId) {
        let Some(space) = self.spaces.remove(&id) else {
            return;
        };
        for frame in self.coremap.frames_of(id) {
            let _ = machine.mmu.tlb.evict_frame(frame);
            self.coremap.release(frame);
        }
        if self.current == Some(id) {
            self.current = None;
            let _ = machine.mmu.tlb.flush();
        }
        if machine
            .mmu
            .page_table
            .as_ref()
            .is_some_and(|t| t.same_table(space.page_table()))
        {
            machine.mmu.page_table = None;
        }
        debug!(space = %id, "address space destroyed");
    }

    /// Saves the MMU state of the running space before switching away.
    ///
    /// Every valid TLB entry is folded back into the current page table and
    /// the TLB is invalidated.
    pub fn save_state(&mut self, machine: &mut Machine) {
        let flushed = machine.mmu.tlb.flush();
        if let Some(space) = self.current.and_then(|id| self.spaces.get(&id)) {
            for entry in flushed {
                fold_back(space.page_table(), &entry);
            }
        }
    }

    /// Makes `id` the running space.
    ///
    /// The TLB is flushed (folding into the outgoing space first) and the
    /// MMU's page table pointer is repointed to the new space's table.
    ///
    /// # Errors
    ///
    /// [`VmError::UnknownSpace`] if `id` is not live.
    pub fn restore_state(&mut self, machine: &mut Machine, id: SpaceId) -> Result<(), VmError> {
        let Some(table) = self.spaces.get(&id).map(|s| s.page_table().clone()) else {
            return Err(VmError::UnknownSpace(id));
        };
        self.save_state(machine);
        machine.mmu.page_table = Some(table);
        self.current = Some(id);
        Ok(())
    }

    /// Resolves a page fault at `vaddr` in the current space.
    ///
    /// An invalid page is brought in; in TLB mode its entry is then loaded into
    /// the TLB. A fault on a valid page is a pure TLB miss.
    ///
    /// # Errors
    ///
    /// [`VmError::OutOfRange`] for an address outside the space, or any
    /// failure while finding a frame or reading the page. The faulting space
    /// has been aborted when an error is returned.
    pub fn handle_page_fault(&mut self, machine: &mut Machine, vaddr: u32) -> Result<(), VmError> {
        let Some(id) = self.current else {
            return Err(VmError::UnknownSpace(SpaceId::new(0)));
        };
        let result = self.resolve(machine, id, vaddr);
        if let Err(err) = &result {
            self.abort(machine, err.space(), err);
        }
        result
    }

    fn resolve(&mut self, machine: &mut Machine, id: SpaceId, vaddr: u32) -> Result<(), VmError> {
        let space = self.spaces.get(&id).ok_or(VmError::UnknownSpace(id))?;
        let vpn = vaddr / self.page_size;
        let Some(entry) = space.page_table().get(vpn) else {
            return Err(VmError::OutOfRange { space: id, vaddr });
        };

        if machine.mmu.uses_tlb() {
            machine.stats.tlb_misses += 1;
        }
        if !entry.valid {
            if self.policy == LoadPolicy::Eager {
                return Err(VmError::OutOfRange { space: id, vaddr });
            }
            debug!(space = %id, vaddr = format_args!("{vaddr:#010x}"), vpn, "page fault");
            let _ = self.page_in(machine, id, vpn)?;
            machine.stats.page_faults += 1;
        }
        if machine.mmu.uses_tlb() {
            self.refill_tlb(machine, id, vpn);
        }
        Ok(())
    }

    /// Brings virtual page `vpn` of `id` into a frame and validates its entry.
    ///
    /// # Errors
    ///
    /// Any failure of [`MemoryManager::find_frame`] or of reading the page.
    pub fn page_in(&mut self, machine: &mut Machine, id: SpaceId, vpn: u32) -> Result<u32, VmError> {
        let frame = self.find_frame(machine, id, vpn)?;
        let space = self
            .spaces
            .get_mut(&id)
            .ok_or(VmError::UnknownSpace(id))?;
        match space.load_page(vpn, machine.memory.frame_mut(frame)) {
            Ok(source) => {
                match source {
                    PageSource::Swap => machine.stats.swap_reads += 1,
                    PageSource::Executable | PageSource::Zero => machine.stats.segment_loads += 1,
                }
                space
                    .page_table()
                    .set(vpn, TranslationEntry::mapped(vpn, frame));
                Ok(frame)
            }
            Err(err) => {
                self.coremap.release(frame);
                Err(err)
            }
        }
    }

    /// Returns a frame for `(id, vpn)`, evicting a victim if none is free.
    ///
    /// Never fails for lack of memory once paging is enabled. If writing the
    /// victim back fails, the victim's owner is aborted and its frames reused.
    ///
    /// # Errors
    ///
    /// [`VmError::OutOfMemory`] under the eager policy when memory is full,
    /// or the eviction error when the victim belongs to `id` itself.
    pub fn find_frame(&mut self, machine: &mut Machine, id: SpaceId, vpn: u32) -> Result<u32, VmError> {
        if let Some(frame) = self.coremap.allocate(id, vpn) {
            return Ok(frame);
        }
        if self.policy == LoadPolicy::Eager {
            return Err(VmError::OutOfMemory {
                space: id,
                needed: 1,
                free: 0,
            });
        }

        let mut bits = FrameBits {
            spaces: &self.spaces,
            tlb: &mut machine.mmu.tlb,
        };
        let Some(victim) = self.coremap.select_victim(&mut bits) else {
            return Err(VmError::OutOfMemory {
                space: id,
                needed: 1,
                free: 0,
            });
        };

        if let Err(err) = self.evict(machine, victim) {
            let owner = err.space();
            self.abort(machine, owner, &err);
            if owner == id {
                return Err(err);
            }
        }
        self.coremap.assign(victim, id, vpn);
        Ok(victim)
    }

    /// Takes frame `frame` away from its owner.
    ///
    /// In order: a TLB copy of the mapping is folded back into the owner's
    /// page table and invalidated; a dirty page is written to the owner's swap
    /// store; the owner's entry is invalidated; the frame is freed.
    ///
    /// # Errors
    ///
    /// The swap failure, or [`VmError::NoSwap`] for a dirty page of a space
    /// without swap. The owner's entry is left untouched on error.
    pub fn evict(&mut self, machine: &mut Machine, frame: u32) -> Result<(), VmError> {
        let Some(owner) = self.coremap.owner(frame) else {
            return Ok(());
        };
        let Some(space) = self.spaces.get_mut(&owner.space) else {
            self.coremap.release(frame);
            return Ok(());
        };

        if let Some(copy) = machine.mmu.tlb.evict_frame(frame) {
            fold_back(space.page_table(), &copy);
        }
        let entry = space.page_table().get(owner.vpn).unwrap_or_default();
        if entry.dirty {
            space.save_to_swap(owner.vpn, machine.memory.frame(frame))?;
            machine.stats.swap_writes += 1;
        }
        space
            .page_table()
            .set(owner.vpn, TranslationEntry::invalid(owner.vpn));
        self.coremap.release(frame);
        machine.stats.evictions += 1;
        debug!(frame, space = %owner.space, vpn = owner.vpn, dirty = entry.dirty, "frame evicted");
        Ok(())
    }

    /// Writes page `vpn` of `id` to its swap store.
    ///
    /// # Errors
    ///
    /// [`VmError::UnknownSpace`], or [`VmError::OutOfRange`] if the page is not
    /// resident, or the swap failure.
    pub fn save_to_swap(&mut self, machine: &mut Machine, id: SpaceId, vpn: u32) -> Result<(), VmError> {
        let space = self.spaces.get_mut(&id).ok_or(VmError::UnknownSpace(id))?;
        let entry = space
            .page_table()
            .get(vpn)
            .filter(|e| e.valid)
            .ok_or(VmError::OutOfRange {
                space: id,
                vaddr: vpn.wrapping_mul(self.page_size),
            })?;
        space.save_to_swap(vpn, machine.memory.frame(entry.physical_page))?;
        machine.stats.swap_writes += 1;
        Ok(())
    }

    /// Reads page `vpn` of `id` from its swap store into frame `frame`.
    ///
    /// # Errors
    ///
    /// [`VmError::UnknownSpace`] or the swap failure.
    pub fn load_from_swap(
        &mut self,
        machine: &mut Machine,
        id: SpaceId,
        vpn: u32,
        frame: u32,
    ) -> Result<(), VmError> {
        let space = self.spaces.get_mut(&id).ok_or(VmError::UnknownSpace(id))?;
        space.load_from_swap(vpn, machine.memory.frame_mut(frame))?;
        machine.stats.swap_reads += 1;
        Ok(())
    }

    /// Loads the page-table entry for `vpn` into the TLB.
    ///
    /// The displaced slot's `used`/`dirty` bits are folded back into the
    /// current page table first.
    pub fn refill_tlb(&mut self, machine: &mut Machine, id: SpaceId, vpn: u32) {
        let Some(space) = self.spaces.get(&id) else {
            return;
        };
        let Some(entry) = space.page_table().get(vpn).filter(|e| e.valid) else {
            return;
        };
        if let Some(displaced) = machine.mmu.tlb.insert(entry)
            && displaced.valid
        {
            fold_back(space.page_table(), &displaced);
        }
        machine.stats.tlb_refills += 1;
        debug!(space = %id, vpn, frame = entry.physical_page, "tlb refill");
    }

    fn abort(&mut self, machine: &mut Machine, id: SpaceId, err: &VmError) {
        if !self.spaces.contains_key(&id) {
            return;
        }
        warn!(space = %id, "aborting address space: {err}");
        self.destroy_space(machine, id);
        self.aborted.push(id);
    }
}

impl fmt::Debug for MemoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryManager")
            .field("spaces", &self.spaces.len())
            .field("current", &self.current)
            .field("free_frames", &self.coremap.free_count())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Copies the reference bits of a TLB slot back into its page-table entry.
fn fold_back(table: &PageTable, copy: &TranslationEntry) {
    let _ = table.update(copy.virtual_page, |entry| {
        if entry.valid && entry.physical_page == copy.physical_page {
            entry.used = copy.used;
            entry.dirty |= copy.dirty;
        }
    });
}

/// Reference bits of resident pages, merged from the page tables and the TLB.
struct FrameBits<'a> {
    spaces: &'a BTreeMap<SpaceId, AddressSpace>,
    tlb: &'a mut Tlb,
}

impl FrameBits<'_> {
    fn table_of(&self, owner: FrameOwner) -> Option<&PageTable> {
        self.spaces.get(&owner.space).map(AddressSpace::page_table)
    }
}

impl ReferenceBits for FrameBits<'_> {
    fn bits(&mut self, frame: u32, owner: FrameOwner) -> (bool, bool) {
        let (mut used, mut dirty) = self
            .table_of(owner)
            .and_then(|table| table.get(owner.vpn))
            .map_or((false, false), |e| (e.used, e.dirty));
        if let Some(copy) = self.tlb.find_frame(frame) {
            used |= copy.used;
            dirty |= copy.dirty;
        }
        (used, dirty)
    }

    fn clear_used(&mut self, frame: u32, owner: FrameOwner) {
        if let Some(table) = self.table_of(owner) {
            let _ = table.update(owner.vpn, |e| e.used = false);
        }
        self.tlb.clear_used_for_frame(frame);
    }
}
