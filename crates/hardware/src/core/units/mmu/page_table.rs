//! Linear page tables.
//!
//! A page table is owned by one address space but must also be visible to
//! the MMU while that space is running. `PageTable` is therefore a cheap,
//! cloneable handle to shared storage; every method keeps its interior borrow
//! local, so handles can be held by both sides without conflicts.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::entry::TranslationEntry;

/// Shared handle to a linear array of translation entries indexed by VPN.
#[derive(Clone)]
pub struct PageTable {
    entries: Rc<RefCell<Vec<TranslationEntry>>>,
}

impl PageTable {
    /// Creates a table of `num_pages` invalid entries.
    pub fn new(num_pages: u32) -> Self {
        let entries = (0..num_pages).map(TranslationEntry::invalid).collect();
        Self {
            entries: Rc::new(RefCell::new(entries)),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the entry for `vpn`.
    pub fn get(&self, vpn: u32) -> Option<TranslationEntry> {
        self.entries.borrow().get(vpn as usize).copied()
    }

    /// Replaces the entry for `vpn`. Out-of-range VPNs are ignored.
    pub fn set(&self, vpn: u32, entry: TranslationEntry) {
        if let Some(slot) = self.entries.borrow_mut().get_mut(vpn as usize) {
            *slot = entry;
        }
    }

    /// Applies `f` to the entry for `vpn` and returns its result.
    pub fn update<R>(&self, vpn: u32, f: impl FnOnce(&mut TranslationEntry) -> R) -> Option<R> {
        self.entries.borrow_mut().get_mut(vpn as usize).map(f)
    }

    /// Returns `true` if both handles refer to the same table.
    pub fn same_table(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    /// Returns a snapshot of every entry.
    pub fn snapshot(&self) -> Vec<TranslationEntry> {
        self.entries.borrow().clone()
    }
}

impl fmt::Debug for PageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        let valid = entries.iter().filter(|e| e.valid).count();
        f.debug_struct("PageTable")
            .field("pages", &entries.len())
            .field("valid", &valid)
            .finish()
    }
}
