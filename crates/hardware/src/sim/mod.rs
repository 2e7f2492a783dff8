//! Program loading and the minimal kernel.
//!
//! Provides the NOFF image format, opening images from disk or memory, and
//! the exception handler that runs them on a [`crate::Machine`].

/// Minimal kernel: paging and the Halt/Exit system calls.
pub mod kernel;

/// Opening program images.
pub mod loader;

/// NOFF header format.
pub mod noff;

pub use self::kernel::Kernel;
pub use self::loader::{ProgramImage, image_from_bytes, open_image};
