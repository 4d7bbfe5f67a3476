//! sbsa-memmap - Boot memory map for the QEMU SBSA reference platform
//!
//! Describes the platform's memory to early firmware: the region table the
//! MMU initialization code installs translation tables from, and the fixed
//! hardware windows advertised to later boot phases.
//!
//! # Outputs
//! - Region table: 4 identity-mapped regions plus a zero sentinel
//! - Resource log: 11 fixed flash/MMIO windows with capped attributes
//!
//! # Architecture
//! - Target: AArch64 (ARM64)
//! - Machine: QEMU `sbsa-ref`
//! - Runs once, single-threaded, before the MMU is enabled

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod drivers;
pub mod mm;
pub mod platform;
pub mod resource;

pub use config::{ConfigError, PlatformConfig};
pub use mm::{MemoryRegionDescriptor, RegionAttribute, VirtualMemoryMap};
pub use platform::{build_virtual_memory_map, MemoryMapError};
pub use resource::{ResourceDescriptor, ResourceLog};
