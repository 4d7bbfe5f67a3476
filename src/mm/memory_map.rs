//! Platform Virtual Memory Map
//!
//! Lays out the region table the translation-table installer consumes.
//!
//! # Table (fixed order)
//! | # | Region | Attributes |
//! |---|--------|------------|
//! | 0 | System DRAM | WriteBack |
//! | 1 | Peripheral space below DRAM | Device |
//! | 2 | Firmware volume image | WriteBack |
//! | 3 | MM communication buffer | UncachedUnbuffered |
//! | 4 | Sentinel | all zero |
//!
//! Entry 1 deliberately covers the same device windows the resource log
//! records individually.

use super::address::PhysAddr;
use super::attributes::RegionAttribute;
use super::region::{MemoryRegionDescriptor, RegionTable};
use crate::config::PlatformConfig;

/// Lay out the region table for `config`.
///
/// # Panics
/// Panics if `config` would produce an empty or wrapping region. A bad
/// configuration is a platform build defect; there is no fallback layout.
pub fn region_table(config: &PlatformConfig) -> RegionTable {
    if let Err(err) = config.validate() {
        panic!("invalid platform configuration: {}", err);
    }

    let dram = MemoryRegionDescriptor::identity(
        config.system_memory_base,
        config.system_memory_size,
        RegionAttribute::WriteBack,
    );

    [
        dram,
        MemoryRegionDescriptor::identity(
            PhysAddr::ZERO,
            dram.physical_base.as_u64(),
            RegionAttribute::Device,
        ),
        // Runs in place, so it must stay executable and cacheable.
        MemoryRegionDescriptor::identity(
            config.fd_base,
            u64::from(config.fd_size),
            RegionAttribute::WriteBack,
        ),
        // Shared with the secure partition without cache maintenance.
        MemoryRegionDescriptor::identity(
            config.mm_buffer_base,
            config.mm_buffer_size,
            RegionAttribute::UncachedUnbuffered,
        ),
        MemoryRegionDescriptor::SENTINEL,
    ]
}
