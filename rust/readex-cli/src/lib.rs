//! readex CLI library.
//!
//! Shared functionality behind the `readex` binary.

pub mod colors;
pub mod config;
pub mod render;
