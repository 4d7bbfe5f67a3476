//! Physical and Virtual Address Types
//!
//! Type-safe wrappers for the 64-bit addresses carried in region and
//! resource descriptors. Firmware runs identity-mapped, so the only
//! physical-to-virtual translation offered is [`VirtAddr::identity`].

use core::fmt;

/// Translation granule (4 KiB)
pub const PAGE_SIZE: u64 = 4096;
/// Page size mask
pub const PAGE_MASK: u64 = PAGE_SIZE - 1;

/// Highest physical address reachable with 48-bit output addresses.
pub const PHYS_ADDR_MAX: u64 = 0x0000_FFFF_FFFF_FFFF;

/// A physical memory address.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PhysAddr(u64);

impl PhysAddr {
    /// The zero address, used by the table sentinel and the low peripheral region.
    pub const ZERO: Self = Self(0);

    /// Create a new physical address.
    ///
    /// # Panics
    /// Panics in debug mode if the address uses more than 48 bits.
    #[inline]
    pub const fn new(addr: u64) -> Self {
        debug_assert!(addr <= PHYS_ADDR_MAX);
        Self(addr)
    }

    /// Get the raw address value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Check if the address is page-aligned.
    #[inline]
    pub const fn is_aligned(self) -> bool {
        self.0 & PAGE_MASK == 0
    }

    /// Add a byte length, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, len: u64) -> Option<Self> {
        match self.0.checked_add(len) {
            Some(end) => Some(Self(end)),
            None => None,
        }
    }
}

impl fmt::Debug for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhysAddr({:#018x})", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// A virtual memory address.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VirtAddr(u64);

impl VirtAddr {
    /// Create a virtual address from a raw value.
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// The virtual address a physical address is mapped at when
    /// translation is the identity.
    #[inline]
    pub const fn identity(phys: PhysAddr) -> Self {
        Self(phys.as_u64())
    }

    /// Get the raw address value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtAddr({:#018x})", self.0)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let phys = PhysAddr::new(0x4000_0000);
        assert_eq!(VirtAddr::identity(phys).as_u64(), phys.as_u64());
    }

    #[test]
    fn test_page_alignment() {
        assert!(PhysAddr::new(0x6000_0000).is_aligned());
        assert!(!PhysAddr::new(0x6000_0800).is_aligned());
    }

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(
            PhysAddr::new(0x1000).checked_add(0x1000),
            Some(PhysAddr::new(0x2000))
        );
        assert_eq!(PhysAddr::new(0x1000).checked_add(u64::MAX), None);
    }
}
