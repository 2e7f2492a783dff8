
/// Machine and kernel test contexts.
pub mod harness;
