//! Memory Region Descriptors
//!
//! One entry of the virtual memory map handed to the translation-table
//! installer, and the sentinel-terminated table that holds them.
//!
//! # Table Layout
//! ```text
//! ┌──────────────┬──────────────┬──────────┬────────────┐
//! │ physical_base│ virtual_base │ length   │ attributes │
//! │ u64          │ u64          │ u64      │ u32        │
//! └──────────────┴──────────────┴──────────┴────────────┘
//! ```
//! The last entry is all-zero; consumers scan until they reach it.

use core::fmt;

use super::address::{PhysAddr, VirtAddr};
use super::attributes::RegionAttribute;

/// Number of descriptor slots in the platform table, sentinel included.
pub const REGION_TABLE_LEN: usize = 5;

/// A physical-to-virtual mapping of one contiguous address range.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct MemoryRegionDescriptor {
    pub physical_base: PhysAddr,
    pub virtual_base: VirtAddr,
    pub length: u64,
    pub attributes: RegionAttribute,
}

impl MemoryRegionDescriptor {
    /// The zero-filled end-of-table marker.
    pub const SENTINEL: Self = Self {
        physical_base: PhysAddr::ZERO,
        virtual_base: VirtAddr::new(0),
        length: 0,
        attributes: RegionAttribute::UncachedUnbuffered,
    };

    /// An identity-mapped region.
    pub const fn identity(base: PhysAddr, length: u64, attributes: RegionAttribute) -> Self {
        Self {
            physical_base: base,
            virtual_base: VirtAddr::identity(base),
            length,
            attributes,
        }
    }

    /// Whether this entry terminates the table.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// Whether `addr` falls inside this region.
    pub fn contains(&self, addr: PhysAddr) -> bool {
        let start = self.physical_base.as_u64();
        addr.as_u64() >= start && addr.as_u64() - start < self.length
    }
}

impl fmt::Debug for MemoryRegionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region(phys={}, virt={}, len={:#x}, {:?})",
            self.physical_base, self.virtual_base, self.length, self.attributes
        )
    }
}

/// The platform table of region descriptors.
pub type RegionTable = [MemoryRegionDescriptor; REGION_TABLE_LEN];

/// A built virtual memory map, permanently resident in boot pool memory.
#[derive(Clone, Copy)]
pub struct VirtualMemoryMap {
    table: &'static RegionTable,
}

impl VirtualMemoryMap {
    pub(crate) fn new(table: &'static RegionTable) -> Self {
        Self { table }
    }

    /// Every slot, sentinel included.
    pub fn table(&self) -> &'static RegionTable {
        self.table
    }

    /// The regions before the sentinel.
    pub fn entries(&self) -> impl Iterator<Item = &'static MemoryRegionDescriptor> {
        let table: &'static RegionTable = self.table;
        table.iter().take_while(|region| !region.is_sentinel())
    }

    /// Number of regions before the sentinel.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first region covering `addr`, in table order.
    pub fn region_for(&self, addr: PhysAddr) -> Option<&'static MemoryRegionDescriptor> {
        self.entries().find(|region| region.contains(addr))
    }

    /// Pointer to the first descriptor, for C consumers.
    pub fn as_ptr(&self) -> *const MemoryRegionDescriptor {
        self.table.as_ptr()
    }
}

impl fmt::Debug for VirtualMemoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_layout() {
        assert_eq!(core::mem::size_of::<MemoryRegionDescriptor>(), 32);
        assert_eq!(core::mem::align_of::<MemoryRegionDescriptor>(), 8);
    }

    #[test]
    fn test_default_is_sentinel() {
        assert!(MemoryRegionDescriptor::default().is_sentinel());
        let region = MemoryRegionDescriptor::identity(PhysAddr::ZERO, 0x1000, RegionAttribute::Device);
        assert!(!region.is_sentinel());
    }

    #[test]
    fn test_contains_is_half_open() {
        let region = MemoryRegionDescriptor::identity(
            PhysAddr::new(0x4000_0000),
            0x1000,
            RegionAttribute::WriteBack,
        );
        assert!(region.contains(PhysAddr::new(0x4000_0000)));
        assert!(region.contains(PhysAddr::new(0x4000_0fff)));
        assert!(!region.contains(PhysAddr::new(0x4000_1000)));
        assert!(!region.contains(PhysAddr::new(0x3fff_ffff)));
    }

    #[test]
    fn test_entries_stop_at_sentinel() {
        static TABLE: RegionTable = [
            MemoryRegionDescriptor::identity(PhysAddr::new(0x1000), 0x1000, RegionAttribute::WriteBack),
            MemoryRegionDescriptor::SENTINEL,
            MemoryRegionDescriptor::identity(PhysAddr::new(0x8000), 0x1000, RegionAttribute::Device),
            MemoryRegionDescriptor::SENTINEL,
            MemoryRegionDescriptor::SENTINEL,
        ];
        let map = VirtualMemoryMap::new(&TABLE);
        assert_eq!(map.len(), 1);
        assert!(map.region_for(PhysAddr::new(0x8000)).is_none());
    }
}
