//! Platform Memory Map Entry Points
//!
//! Builds the virtual memory map and registers the platform's fixed
//! resources, once, during early boot.
//!
//! # Sequence
//! 1. Lay out the region table from the platform configuration
//! 2. Move it into boot pool memory (fails cleanly if the pool is exhausted)
//! 3. Register every fixed hardware window with the resource log
//! 4. Hand the permanent table to the caller
//!
//! Nothing is registered unless the table was allocated.

use core::fmt;

use crate::config::{active_config, PlatformConfig};
use crate::mm::memory_map::region_table;
use crate::mm::pool::{BootPool, BOOT_POOL};
use crate::mm::region::{MemoryRegionDescriptor, VirtualMemoryMap};
use crate::resource::{register_platform_resources, ResourceLog, RESOURCE_LOG};

/// Error type for building the memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMapError {
    /// The boot pool could not hold the region table.
    PoolExhausted,
}

impl fmt::Display for MemoryMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoolExhausted => write!(f, "boot pool exhausted allocating the region table"),
        }
    }
}

/// Build the platform's virtual memory map.
///
/// The table is allocated from `pool` and never freed. On success every
/// fixed window has also been registered with `resources`; on failure
/// neither the pool nor `resources` is modified.
///
/// # Panics
/// Panics if `config` is invalid (see [`PlatformConfig::validate`]).
pub fn build_virtual_memory_map(
    config: &PlatformConfig,
    pool: &BootPool,
    resources: &mut ResourceLog,
) -> Result<VirtualMemoryMap, MemoryMapError> {
    let table = region_table(config);

    let Some(table) = pool.allocate(table) else {
        log::error!("build_virtual_memory_map: {}", MemoryMapError::PoolExhausted);
        return Err(MemoryMapError::PoolExhausted);
    };

    let dram = &table[0];
    log::info!(
        "System DRAM: phys={} virt={} len={:#x}",
        dram.physical_base,
        dram.virtual_base,
        dram.length
    );

    register_platform_resources(resources);

    Ok(VirtualMemoryMap::new(table))
}

/// Build the map and store a pointer to its first descriptor in `out`.
///
/// `out` is left untouched if the table cannot be allocated.
///
/// # Panics
/// Panics if `out` is null.
///
/// # Safety
/// A non-null `out` must be valid for a pointer-sized write.
pub unsafe fn write_virtual_memory_map(
    out: *mut *const MemoryRegionDescriptor,
    config: &PlatformConfig,
    pool: &BootPool,
    resources: &mut ResourceLog,
) {
    assert!(!out.is_null(), "virtual memory map destination is null");

    if let Ok(map) = build_virtual_memory_map(config, pool, resources) {
        // SAFETY: `out` is non-null and the caller guarantees it is writable.
        unsafe { out.write(map.as_ptr()) };
    }
}

/// C entry point for the MMU initialization code.
///
/// Uses the active configuration, the process-wide boot pool and the
/// process-wide resource log. The returned array ends with a zero-filled
/// descriptor and is never freed.
///
/// # Safety
/// `virtual_memory_map` must be null or valid for a pointer-sized write.
/// A null pointer aborts boot.
#[export_name = "ArmPlatformGetVirtualMemoryMap"]
pub unsafe extern "C" fn platform_get_virtual_memory_map(
    virtual_memory_map: *mut *const MemoryRegionDescriptor,
) {
    let config = active_config();
    let mut resources = RESOURCE_LOG.lock();

    // SAFETY: forwarded from this function's contract.
    unsafe { write_virtual_memory_map(virtual_memory_map, &config, &BOOT_POOL, &mut resources) };
}
