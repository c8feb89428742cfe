//! Host-specific counter backends.

#[cfg(windows)]
pub mod windows;
