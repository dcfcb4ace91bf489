//! Thin wrappers over the operating system's file calls.

#[cfg(unix)]
mod posix;

#[cfg(unix)]
pub use posix::*;
