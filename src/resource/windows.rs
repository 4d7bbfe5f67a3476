//! Fixed Hardware Windows
//!
//! The platform's device and flash windows, in registration order. These
//! are fixed platform addresses, not derived values.

use super::descriptor::{CachePolicy, ResourceDescriptor, ResourceType, RESOURCE_CAP};
use crate::mm::address::PhysAddr;

/// A named fixed window of the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformWindow {
    pub name: &'static str,
    pub resource_type: ResourceType,
    pub base: u64,
    pub length: u64,
    pub cache_policy: CachePolicy,
}

impl PlatformWindow {
    const fn mmio(name: &'static str, base: u64, length: u64) -> Self {
        Self {
            name,
            resource_type: ResourceType::MemoryMappedIo,
            base,
            length,
            cache_policy: CachePolicy::Uncacheable,
        }
    }

    /// The descriptor registered for this window.
    pub const fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            resource_type: self.resource_type,
            attributes: RESOURCE_CAP,
            physical_base: PhysAddr::new(self.base),
            length: self.length,
            cache_policy: self.cache_policy,
        }
    }
}

/// PL011 UART base, also used by the logging console.
pub const UART_BASE: u64 = 0x6000_0000;

/// Number of fixed windows.
pub const PLATFORM_WINDOW_COUNT: usize = 11;

/// Every fixed window, in registration order.
pub const PLATFORM_WINDOWS: [PlatformWindow; PLATFORM_WINDOW_COUNT] = [
    PlatformWindow {
        name: "FLASH",
        resource_type: ResourceType::FirmwareDevice,
        base: 0x0000_0000,
        length: 0x2000_0000,
        cache_policy: CachePolicy::WriteBack,
    },
    PlatformWindow::mmio("CPUPERIPHS", 0x4000_0000, 0x0004_0000),
    PlatformWindow::mmio("GIC_D", 0x4006_0000, 0x0001_0000),
    PlatformWindow::mmio("GIC_R", 0x4008_0000, 0x0400_0000),
    PlatformWindow::mmio("UART", UART_BASE, 0x0000_1000),
    PlatformWindow::mmio("SMMU", 0x6005_0000, 0x0002_0000),
    PlatformWindow::mmio("AHCI", 0x6010_0000, 0x0001_0000),
    PlatformWindow::mmio("XHCI", 0x6011_0000, 0x0001_0000),
    PlatformWindow::mmio("PCIE_PIO", 0x7fff_0000, 0x0001_0000),
    PlatformWindow::mmio("PCIE_MMIO", 0x8000_0000, 0x7000_0000),
    PlatformWindow::mmio("PCIE_ECAM", 0xf000_0000, 0x1000_0000),
];

/// Descriptors for every fixed window, in registration order.
pub fn platform_resources() -> [ResourceDescriptor; PLATFORM_WINDOW_COUNT] {
    PLATFORM_WINDOWS.map(|window| window.descriptor())
}
