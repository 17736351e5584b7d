//! Host-testable core of the volume-mixer firmware.
//!
//! Holds everything that doesn't touch hardware: the USB descriptor
//! tables and their GET_DESCRIPTOR resolver, the mixer report protocol,
//! and the compile-time configuration shared with the firmware.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary (main.rs, feature `embedded`) links this
//! library and adds the Embassy USB, SAADC and display tasks.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod descriptors;
pub mod error;
pub mod mixer;

pub use descriptors::{descriptor_len, get_descriptor, DescriptorRequest, DescriptorType};
pub use error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
