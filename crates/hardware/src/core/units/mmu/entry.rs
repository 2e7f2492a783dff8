//! Translation entries.
//!
//! A `TranslationEntry` maps one virtual page to one physical frame. The same
//! structure is used for page-table slots and TLB slots; a TLB slot is a
//! transient copy of a page-table entry whose `used`/`dirty` bits are folded
//! back into the table when the slot is displaced or flushed.

/// Virtual-to-physical mapping for a single page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Virtual page number.
    pub virtual_page: u32,
    /// Physical frame number.
    pub physical_page: u32,
    /// The mapping may be used for translation.
    pub valid: bool,
    /// Writes through this mapping raise `ReadOnly`.
    pub read_only: bool,
    /// Set by the hardware on every successful translation.
    pub used: bool,
    /// Set by the hardware on every successful write translation.
    pub dirty: bool,
}

impl TranslationEntry {
    /// Creates a valid, writable, unreferenced mapping.
    pub fn mapped(virtual_page: u32, physical_page: u32) -> Self {
        Self {
            virtual_page,
            physical_page,
            valid: true,
            ..Self::default()
        }
    }

    /// Creates an invalid entry for `virtual_page`.
    pub fn invalid(virtual_page: u32) -> Self {
        Self {
            virtual_page,
            ..Self::default()
        }
    }
}
