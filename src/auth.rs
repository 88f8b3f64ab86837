//! Bearer credential handling shared by every header-based provider.

pub mod header;
pub mod secret;

pub use header::*;
pub use secret::*;
