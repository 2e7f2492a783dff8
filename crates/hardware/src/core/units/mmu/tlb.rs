//! Translation Lookaside Buffer (TLB).
//!
//! A small, fully associative, software-managed cache of translation entries.
//! Lookups are a linear scan for a valid entry with a matching virtual page.
//! The TLB is not tagged with an address-space id, so it must be flushed on
//! every context switch; refills replace slots round-robin.

use super::entry::TranslationEntry;

/// Translation Lookaside Buffer structure.
#[derive(Clone, Debug)]
pub struct Tlb {
    /// TLB slots.
    entries: Vec<TranslationEntry>,
    /// Next slot to replace when no slot is free.
    next_victim: usize,
}

impl Tlb {
    /// Creates a TLB with `size` invalid slots.
    pub fn new(size: usize) -> Self {
        Self {
            entries: vec![TranslationEntry::default(); size],
            next_victim: 0,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the TLB has no slots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the valid slot mapping `vpn`.
    #[inline]
    pub fn lookup_mut(&mut self, vpn: u32) -> Option<&mut TranslationEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.valid && e.virtual_page == vpn)
    }

    /// Returns the valid slot mapping `vpn`, if any.
    pub fn lookup(&self, vpn: u32) -> Option<&TranslationEntry> {
        self.entries
            .iter()
            .find(|e| e.valid && e.virtual_page == vpn)
    }

    /// Returns the valid slot that maps physical frame `frame`, if any.
    pub fn find_frame(&self, frame: u32) -> Option<&TranslationEntry> {
        self.entries
            .iter()
            .find(|e| e.valid && e.physical_page == frame)
    }

    /// Loads `entry` into the TLB.
    ///
    /// An invalid slot is used if one exists; otherwise the round-robin
    /// victim is replaced. Returns the valid entry that was displaced so its
    /// `used`/`dirty` bits can be folded back into its page table.
    pub fn insert(&mut self, entry: TranslationEntry) -> Option<TranslationEntry> {
        if self.entries.is_empty() {
            return None;
        }
        if let Some(slot) = self.entries.iter_mut().find(|e| !e.valid) {
            *slot = entry;
            return None;
        }
        let idx = self.next_victim % self.entries.len();
        self.next_victim = (idx + 1) % self.entries.len();
        let displaced = std::mem::replace(&mut self.entries[idx], entry);
        Some(displaced)
    }

    /// Invalidates the slot mapping frame `frame` and returns its last contents.
    pub fn evict_frame(&mut self, frame: u32) -> Option<TranslationEntry> {
        let slot = self
            .entries
            .iter_mut()
            .find(|e| e.valid && e.physical_page == frame)?;
        let old = *slot;
        slot.valid = false;
        Some(old)
    }

    /// Clears the `used` bit of the slot mapping frame `frame`.
    pub fn clear_used_for_frame(&mut self, frame: u32) {
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|e| e.valid && e.physical_page == frame)
        {
            slot.used = false;
        }
    }

    /// Invalidates every slot and returns the entries that were valid.
    ///
    /// Called on context switch; the caller folds the returned entries back
    /// into the outgoing space's page table.
    pub fn flush(&mut self) -> Vec<TranslationEntry> {
        let valid = self.entries.iter().filter(|e| e.valid).copied().collect();
        for e in &mut self.entries {
            e.valid = false;
        }
        valid
    }

    /// Returns every slot, valid or not.
    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }
}
