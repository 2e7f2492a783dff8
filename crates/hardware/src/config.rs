//! Configuration system for the MIPS machine simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline machine geometry (page size, frame count, TLB size).
//! 2. **Structures:** Hierarchical config for general, memory, and paging settings.
//! 3. **Enums:** Address translation mode and page loading policy.
//!
//! Configuration is supplied as JSON (`Config::from_json_str` / `Config::from_json_file`)
//! or use `Config::default()` for the CLI.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden.
mod defaults {
    use crate::common::constants;

    /// Size of a virtual page and of a physical frame, in bytes.
    pub const PAGE_SIZE: u32 = constants::PAGE_SIZE;

    /// Number of physical frames in main memory.
    pub const NUM_PHYS_PAGES: u32 = constants::NUM_PHYS_PAGES;

    /// Translation Lookaside Buffer entry count.
    pub const TLB_SIZE: usize = constants::TLB_SIZE;

    /// Bytes reserved for the user stack at the top of each address space.
    pub const USER_STACK_SIZE: u32 = constants::USER_STACK_SIZE;

    /// Upper bound on simulated ticks before the run loop gives up.
    pub const MAX_TICKS: u64 = 100_000_000;
}

/// Address translation hardware selection.
///
/// Exactly one of the two mechanisms is active while user code runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TranslationMode {
    /// Linear page table indexed by virtual page number.
    #[default]
    PageTable,
    /// Small fully-associative software-managed TLB.
    #[serde(alias = "TLB")]
    Tlb,
}

/// When pages of a program are brought into physical memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum LoadPolicy {
    /// Every page is loaded when the space is created. Nothing is ever evicted.
    #[default]
    Eager,
    /// Pages are loaded on first touch; only clean pages may be evicted.
    Demand,
    /// Pages are loaded on first touch; dirty victims are written to a swap store.
    DemandWithSwap,
}

impl LoadPolicy {
    /// Returns `true` for the policies that load pages on a fault.
    pub fn is_demand(self) -> bool {
        !matches!(self, Self::Eager)
    }

    /// Returns `true` when address spaces get a swap store.
    pub fn uses_swap(self) -> bool {
        matches!(self, Self::DemandWithSwap)
    }
}

/// Errors raised while reading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid JSON for [`Config`].
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is syntactically valid but unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use mipsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.general.trace_instructions, false);
/// assert_eq!(config.memory.page_size, 128);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use mipsim_core::config::{Config, LoadPolicy, TranslationMode};
///
/// let json = r#"{
///     "general": { "trace_instructions": true, "max_ticks": 5000 },
///     "memory": {
///         "page_size": 128,
///         "num_phys_pages": 2,
///         "tlb_size": 4,
///         "translation": "Tlb"
///     },
///     "paging": { "policy": "DemandWithSwap" }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.memory.num_phys_pages, 2);
/// assert_eq!(config.memory.translation, TranslationMode::Tlb);
/// assert_eq!(config.paging.policy, LoadPolicy::DemandWithSwap);
/// assert_eq!(config.paging.user_stack_size, 1024);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Physical memory and translation hardware
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Page loading and swapping
    #[serde(default)]
    pub paging: PagingConfig,
}

impl Config {
    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, [`ConfigError::Invalid`]
    /// when validation fails.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as for
    /// [`Config::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks the cross-field constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let page = self.memory.page_size;
        if page < 4 || !page.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "page_size must be a power of two of at least 4, got {page}"
            )));
        }
        if self.memory.num_phys_pages == 0 {
            return Err(ConfigError::Invalid("num_phys_pages must be non-zero".into()));
        }
        if self.memory.num_phys_pages.checked_mul(page).is_none() {
            return Err(ConfigError::Invalid(
                "physical memory does not fit a 32-bit address".into(),
            ));
        }
        if self.memory.tlb_size == 0 {
            return Err(ConfigError::Invalid("tlb_size must be non-zero".into()));
        }
        Ok(())
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Log every executed instruction (disassembled) at trace level
    #[serde(default)]
    pub trace_instructions: bool,

    /// Stop the run loop after this many ticks
    #[serde(default = "GeneralConfig::default_max_ticks")]
    pub max_ticks: u64,
}

impl GeneralConfig {
    fn default_max_ticks() -> u64 {
        defaults::MAX_TICKS
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            max_ticks: defaults::MAX_TICKS,
        }
    }
}

/// Physical memory geometry and translation hardware.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Bytes per page and per frame
    #[serde(default = "MemoryConfig::default_page_size")]
    pub page_size: u32,

    /// Number of physical frames
    #[serde(default = "MemoryConfig::default_num_phys_pages")]
    pub num_phys_pages: u32,

    /// Number of TLB entries (only used in TLB mode)
    #[serde(default = "MemoryConfig::default_tlb_size")]
    pub tlb_size: usize,

    /// Active translation mechanism
    #[serde(default)]
    pub translation: TranslationMode,
}

impl MemoryConfig {
    fn default_page_size() -> u32 {
        defaults::PAGE_SIZE
    }

    fn default_num_phys_pages() -> u32 {
        defaults::NUM_PHYS_PAGES
    }

    fn default_tlb_size() -> usize {
        defaults::TLB_SIZE
    }

    /// Total physical memory in bytes.
    pub fn memory_size(&self) -> usize {
        self.page_size as usize * self.num_phys_pages as usize
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::PAGE_SIZE,
            num_phys_pages: defaults::NUM_PHYS_PAGES,
            tlb_size: defaults::TLB_SIZE,
            translation: TranslationMode::default(),
        }
    }
}

/// Page loading, stack sizing and swap placement.
#[derive(Debug, Clone, Deserialize)]
pub struct PagingConfig {
    /// When pages are brought in
    #[serde(default)]
    pub policy: LoadPolicy,

    /// Bytes appended to every address space for the user stack
    #[serde(default = "PagingConfig::default_user_stack_size")]
    pub user_stack_size: u32,

    /// Directory for file-backed swap stores; in-memory stores when unset
    #[serde(default)]
    pub swap_dir: Option<PathBuf>,
}

impl PagingConfig {
    fn default_user_stack_size() -> u32 {
        defaults::USER_STACK_SIZE
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            policy: LoadPolicy::default(),
            user_stack_size: defaults::USER_STACK_SIZE,
            swap_dir: None,
        }
    }
}
