//! Resource Descriptor Types
//!
//! A resource descriptor advertises a hardware window to later boot phases:
//! where it is, what kind of resource it is, which attributes it may carry
//! and how it should be cached once mapped.

use core::fmt;

use bitflags::bitflags;

use crate::mm::address::PhysAddr;

/// Kind of resource a window describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ResourceType {
    /// Memory-mapped device registers.
    MemoryMappedIo = 0x0000_0001,
    /// Flash or other firmware storage.
    FirmwareDevice = 0x0000_0003,
}

bitflags! {
    /// Resource attribute bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ResourceAttributes: u32 {
        const PRESENT = 0x0000_0001;
        const INITIALIZED = 0x0000_0002;
        const TESTED = 0x0000_0004;
        const UNCACHEABLE = 0x0000_0400;
        const WRITE_COMBINEABLE = 0x0000_0800;
        const WRITE_THROUGH_CACHEABLE = 0x0000_1000;
        const WRITE_BACK_CACHEABLE = 0x0000_2000;
    }
}

/// Ceiling applied to every window registered on this platform.
pub const RESOURCE_CAP: ResourceAttributes = ResourceAttributes::PRESENT
    .union(ResourceAttributes::INITIALIZED)
    .union(ResourceAttributes::UNCACHEABLE)
    .union(ResourceAttributes::WRITE_COMBINEABLE)
    .union(ResourceAttributes::WRITE_THROUGH_CACHEABLE)
    .union(ResourceAttributes::WRITE_BACK_CACHEABLE)
    .union(ResourceAttributes::TESTED);

/// Cache policy the OS applies when it maps the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum CachePolicy {
    Uncacheable = 0x0000_0001,
    WriteBack = 0x0000_0008,
}

impl CachePolicy {
    /// Memory-attribute bit value of this policy.
    pub const fn bits(self) -> u64 {
        self as u64
    }
}

/// A hardware window registered with the resource log.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub resource_type: ResourceType,
    pub attributes: ResourceAttributes,
    pub physical_base: PhysAddr,
    pub length: u64,
    pub cache_policy: CachePolicy,
}

impl ResourceDescriptor {
    /// Whether the descriptor's address range intersects `other`'s.
    pub fn overlaps(&self, other: &Self) -> bool {
        let (a, b) = (self.physical_base.as_u64(), other.physical_base.as_u64());
        a < b.saturating_add(other.length) && b < a.saturating_add(self.length)
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resource({:?}, base={}, len={:#x}, attrs={:#x}, {:?})",
            self.resource_type,
            self.physical_base,
            self.length,
            self.attributes.bits(),
            self.cache_policy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_cap_bits() {
        assert_eq!(RESOURCE_CAP.bits(), 0x3C07);
        assert_eq!(RESOURCE_CAP, ResourceAttributes::all());
    }

    #[test]
    fn test_cache_policy_bits() {
        assert_eq!(CachePolicy::Uncacheable.bits(), 0x1);
        assert_eq!(CachePolicy::WriteBack.bits(), 0x8);
    }

    #[test]
    fn test_overlap() {
        let window = |base: u64, length: u64| ResourceDescriptor {
            resource_type: ResourceType::MemoryMappedIo,
            attributes: RESOURCE_CAP,
            physical_base: PhysAddr::new(base),
            length,
            cache_policy: CachePolicy::Uncacheable,
        };
        assert!(!window(0x4006_0000, 0x1_0000).overlaps(&window(0x4008_0000, 0x400_0000)));
        assert!(window(0x4000_0000, 0x10_0000).overlaps(&window(0x4006_0000, 0x1_0000)));
    }
}
