//! Platform Resource Registry
//!
//! Fixed-capacity record of registered resource descriptors, consumed by
//! later boot phases (e.g. to build memory-type range tables).
//!
//! # Design
//! - Entries are append-only and never modified
//! - Capacity is fixed; the platform's window list is known to fit
//! - The process-wide log is protected by a spinlock

use core::fmt;

use spin::Mutex;

use super::descriptor::{CachePolicy, ResourceAttributes, ResourceDescriptor, ResourceType};
use crate::mm::address::PhysAddr;

/// Number of descriptors the log can hold.
pub const RESOURCE_LOG_CAPACITY: usize = 32;

/// Error returned when the log has no free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLogFull;

impl fmt::Display for ResourceLogFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource log full ({} entries)", RESOURCE_LOG_CAPACITY)
    }
}

/// Append-only log of resource descriptors.
pub struct ResourceLog {
    entries: [Option<ResourceDescriptor>; RESOURCE_LOG_CAPACITY],
    len: usize,
}

impl ResourceLog {
    pub const fn new() -> Self {
        Self {
            entries: [None; RESOURCE_LOG_CAPACITY],
            len: 0,
        }
    }

    /// Append a descriptor.
    pub fn try_push(&mut self, descriptor: ResourceDescriptor) -> Result<(), ResourceLogFull> {
        let slot = self.entries.get_mut(self.len).ok_or(ResourceLogFull)?;
        *slot = Some(descriptor);
        self.len += 1;
        Ok(())
    }

    /// Record a hardware window.
    ///
    /// # Panics
    /// Panics if the log is full. The platform's window list is fixed and
    /// sized to fit, so running out of slots is fatal to boot.
    pub fn register(
        &mut self,
        resource_type: ResourceType,
        attributes: ResourceAttributes,
        base: PhysAddr,
        length: u64,
        cache_policy: CachePolicy,
    ) {
        let descriptor = ResourceDescriptor {
            resource_type,
            attributes,
            physical_base: base,
            length,
            cache_policy,
        };

        if let Err(err) = self.try_push(descriptor) {
            panic!("{}: cannot register {:?}", err, descriptor);
        }
        log::debug!("registered {:?}", descriptor);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Registered descriptors, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.entries[..self.len].iter().flatten()
    }

    /// The first registered descriptor covering `addr`.
    pub fn find(&self, addr: PhysAddr) -> Option<&ResourceDescriptor> {
        self.iter().find(|d| {
            addr >= d.physical_base && addr.as_u64() - d.physical_base.as_u64() < d.length
        })
    }
}

impl Default for ResourceLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Global resource log instance.
pub static RESOURCE_LOG: Mutex<ResourceLog> = Mutex::new(ResourceLog::new());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::descriptor::RESOURCE_CAP;

    fn uart() -> ResourceDescriptor {
        ResourceDescriptor {
            resource_type: ResourceType::MemoryMappedIo,
            attributes: RESOURCE_CAP,
            physical_base: PhysAddr::new(0x6000_0000),
            length: 0x1000,
            cache_policy: CachePolicy::Uncacheable,
        }
    }

    #[test]
    fn test_register_appends_in_order() {
        let mut log = ResourceLog::new();
        log.register(
            ResourceType::FirmwareDevice,
            RESOURCE_CAP,
            PhysAddr::new(0),
            0x2000_0000,
            CachePolicy::WriteBack,
        );
        log.try_push(uart()).unwrap();

        assert_eq!(log.len(), 2);
        let types: Vec<_> = log.iter().map(|d| d.resource_type).collect();
        assert_eq!(types, [ResourceType::FirmwareDevice, ResourceType::MemoryMappedIo]);
    }

    #[test]
    fn test_find() {
        let mut log = ResourceLog::new();
        log.try_push(uart()).unwrap();
        assert_eq!(log.find(PhysAddr::new(0x6000_0ffc)), Some(&uart()));
        assert_eq!(log.find(PhysAddr::new(0x6000_1000)), None);
    }

    #[test]
    fn test_full_log_rejects_push() {
        let mut log = ResourceLog::new();
        for _ in 0..RESOURCE_LOG_CAPACITY {
            log.try_push(uart()).unwrap();
        }
        assert_eq!(log.try_push(uart()), Err(ResourceLogFull));
        assert_eq!(log.len(), RESOURCE_LOG_CAPACITY);
    }

    #[test]
    #[should_panic(expected = "resource log full")]
    fn test_full_log_is_fatal() {
        let mut log = ResourceLog::new();
        for _ in 0..RESOURCE_LOG_CAPACITY {
            log.try_push(uart()).unwrap();
        }
        log.register(
            ResourceType::MemoryMappedIo,
            RESOURCE_CAP,
            PhysAddr::new(0x6000_0000),
            0x1000,
            CachePolicy::Uncacheable,
        );
    }
}
