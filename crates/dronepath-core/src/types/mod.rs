//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for shared, lock-protected state.

pub mod aliases;

pub use aliases::*;
