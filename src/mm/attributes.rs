//! Region Attribute Classes
//!
//! The caching/access class carried by each memory-region descriptor, and
//! its translation into AArch64 VMSA block-descriptor attribute bits for the
//! translation-table installer.
//!
//! # MAIR layout
//! - Index 0: Device-nGnRnE
//! - Index 1: Normal, non-cacheable
//! - Index 2: Normal, write-through, read/write-allocate
//! - Index 3: Normal, write-back, read/write-allocate

use bitflags::bitflags;

/// MAIR_EL1/EL2 value matching the attribute indices used below.
pub const MAIR_VALUE: u64 = 0x00 | (0x44 << 8) | (0xBB << 16) | (0xFF << 24);

const MAIR_INDEX_DEVICE: u64 = 0;
const MAIR_INDEX_NON_CACHEABLE: u64 = 1;
const MAIR_INDEX_WRITE_THROUGH: u64 = 2;
const MAIR_INDEX_WRITE_BACK: u64 = 3;

/// Caching/access class of a memory region.
///
/// Discriminant 0 is `UncachedUnbuffered` so that a zero-filled descriptor
/// reads back as the table sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u32)]
pub enum RegionAttribute {
    #[default]
    UncachedUnbuffered = 0,
    NonSecureUncachedUnbuffered = 1,
    WriteBack = 2,
    NonSecureWriteBack = 3,
    WriteBackNonShareable = 4,
    NonSecureWriteBackNonShareable = 5,
    WriteThrough = 6,
    NonSecureWriteThrough = 7,
    Device = 8,
    NonSecureDevice = 9,
}

bitflags! {
    /// Lower and upper attribute bits of a stage-1 block/page descriptor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BlockAttributes: u64 {
        /// AttrIndx [4:2], selects a MAIR entry.
        const ATTR_INDX = 0b111 << 2;
        /// Non-Secure [5].
        const NS = 1 << 5;
        /// AP[2]: read-only.
        const AP_RO = 1 << 7;
        /// Shareability [9:8], outer shareable.
        const SH_OUTER = 0b10 << 8;
        /// Shareability [9:8], inner shareable.
        const SH_INNER = 0b11 << 8;
        /// Access Flag [10].
        const AF = 1 << 10;
        /// Privileged Execute Never [53].
        const PXN = 1 << 53;
        /// User Execute Never [54].
        const UXN = 1 << 54;
    }
}

impl BlockAttributes {
    const fn attr_index(index: u64) -> Self {
        Self::from_bits_retain(index << 2)
    }

    /// The MAIR index selected by these attributes.
    pub const fn mair_index(self) -> u64 {
        (self.bits() & Self::ATTR_INDX.bits()) >> 2
    }
}

impl RegionAttribute {
    /// Whether the region is mapped with the Non-Secure bit set.
    pub const fn is_non_secure(self) -> bool {
        matches!(
            self,
            Self::NonSecureUncachedUnbuffered
                | Self::NonSecureWriteBack
                | Self::NonSecureWriteBackNonShareable
                | Self::NonSecureWriteThrough
                | Self::NonSecureDevice
        )
    }

    /// Whether instructions may be fetched from the region.
    pub const fn is_executable(self) -> bool {
        !matches!(self, Self::Device | Self::NonSecureDevice)
    }

    /// Block-descriptor attribute bits for this class.
    pub fn block_attributes(self) -> BlockAttributes {
        let mut attrs = match self {
            Self::UncachedUnbuffered | Self::NonSecureUncachedUnbuffered => {
                BlockAttributes::attr_index(MAIR_INDEX_NON_CACHEABLE) | BlockAttributes::SH_OUTER
            }
            Self::WriteBack | Self::NonSecureWriteBack => {
                BlockAttributes::attr_index(MAIR_INDEX_WRITE_BACK) | BlockAttributes::SH_INNER
            }
            Self::WriteBackNonShareable | Self::NonSecureWriteBackNonShareable => {
                BlockAttributes::attr_index(MAIR_INDEX_WRITE_BACK)
            }
            Self::WriteThrough | Self::NonSecureWriteThrough => {
                BlockAttributes::attr_index(MAIR_INDEX_WRITE_THROUGH) | BlockAttributes::SH_INNER
            }
            Self::Device | Self::NonSecureDevice => {
                BlockAttributes::attr_index(MAIR_INDEX_DEVICE)
            }
        };

        attrs |= BlockAttributes::AF;
        if self.is_non_secure() {
            attrs |= BlockAttributes::NS;
        }
        if !self.is_executable() {
            attrs |= BlockAttributes::PXN | BlockAttributes::UXN;
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_attribute_is_zero() {
        assert_eq!(RegionAttribute::default() as u32, 0);
    }

    #[test]
    fn test_write_back_is_cacheable_and_executable() {
        let attrs = RegionAttribute::WriteBack.block_attributes();
        assert_eq!(attrs.mair_index(), MAIR_INDEX_WRITE_BACK);
        assert!(attrs.contains(BlockAttributes::SH_INNER | BlockAttributes::AF));
        assert!(!attrs.intersects(BlockAttributes::PXN | BlockAttributes::UXN));
        assert_eq!((MAIR_VALUE >> (8 * attrs.mair_index())) & 0xFF, 0xFF);
    }

    #[test]
    fn test_device_is_execute_never() {
        let attrs = RegionAttribute::Device.block_attributes();
        assert_eq!(attrs.mair_index(), MAIR_INDEX_DEVICE);
        assert!(attrs.contains(BlockAttributes::PXN | BlockAttributes::UXN));
        assert!(!attrs.contains(BlockAttributes::NS));
    }

    #[test]
    fn test_uncached_uses_non_cacheable_index() {
        let attrs = RegionAttribute::UncachedUnbuffered.block_attributes();
        assert_eq!(attrs.mair_index(), MAIR_INDEX_NON_CACHEABLE);
        assert_eq!((MAIR_VALUE >> (8 * attrs.mair_index())) & 0xFF, 0x44);
    }

    #[test]
    fn test_non_secure_variants_set_ns() {
        assert!(RegionAttribute::NonSecureWriteBack
            .block_attributes()
            .contains(BlockAttributes::NS));
        assert!(RegionAttribute::NonSecureDevice
            .block_attributes()
            .contains(BlockAttributes::NS | BlockAttributes::PXN));
    }
}
