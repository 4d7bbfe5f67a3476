//! Resource registration for the platform's fixed hardware windows.
//!
//! Provides:
//! - Resource descriptor types and the platform attribute cap
//! - The fixed window table
//! - The append-only resource log later boot phases read from

pub mod descriptor;
pub mod registry;
pub mod windows;

pub use descriptor::{CachePolicy, ResourceAttributes, ResourceDescriptor, ResourceType, RESOURCE_CAP};
pub use registry::{ResourceLog, ResourceLogFull, RESOURCE_LOG, RESOURCE_LOG_CAPACITY};
pub use windows::{platform_resources, PlatformWindow, PLATFORM_WINDOWS, PLATFORM_WINDOW_COUNT};

/// Register every fixed platform window with `log`, in table order.
pub fn register_platform_resources(log: &mut ResourceLog) {
    for resource in platform_resources() {
        log.register(
            resource.resource_type,
            resource.attributes,
            resource.physical_base,
            resource.length,
            resource.cache_policy,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_all_windows_in_order() {
        let mut log = ResourceLog::new();
        register_platform_resources(&mut log);

        assert_eq!(log.len(), PLATFORM_WINDOW_COUNT);
        for (logged, window) in log.iter().zip(PLATFORM_WINDOWS.iter()) {
            assert_eq!(*logged, window.descriptor());
        }
    }
}
