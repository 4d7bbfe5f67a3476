//! Memory map module
//!
//! Provides:
//! - Physical/virtual address types
//! - Region attribute classes and their translation attributes
//! - The boot pool the region table is allocated from
//! - The platform region table
//!
//! # Principles
//! - Every region is identity mapped
//! - Table storage is allocated once and never freed

pub mod address;
pub mod attributes;
pub mod memory_map;
pub mod pool;
pub mod region;

pub use address::{PhysAddr, VirtAddr, PAGE_SIZE};
pub use attributes::{BlockAttributes, RegionAttribute, MAIR_VALUE};
pub use memory_map::region_table;
pub use pool::{init_boot_pool, BootPool, BOOT_POOL};
pub use region::{
    MemoryRegionDescriptor, RegionTable, VirtualMemoryMap, REGION_TABLE_LEN,
};
