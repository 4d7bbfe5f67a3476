//! Platform Configuration
//!
//! The base/size pairs the memory map is built from. These are build-time
//! platform values; the builder receives them explicitly as a
//! [`PlatformConfig`] instead of looking them up itself.

use core::fmt;

use spin::Mutex;

use crate::mm::address::{PhysAddr, PAGE_MASK};

/// A base/size pair describing one physical window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryWindow {
    pub base: PhysAddr,
    pub size: u64,
}

impl MemoryWindow {
    pub const fn new(base: u64, size: u64) -> Self {
        Self {
            base: PhysAddr::new(base),
            size,
        }
    }
}

/// Configuration inputs of the memory map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Start of system DRAM.
    pub system_memory_base: PhysAddr,
    /// Size of system DRAM in bytes.
    pub system_memory_size: u64,
    /// Load address of the firmware volume image.
    pub fd_base: PhysAddr,
    /// Size of the firmware volume image. Fixed at build time.
    pub fd_size: u32,
    /// Start of the MM communication buffer.
    pub mm_buffer_base: PhysAddr,
    /// Size of the MM communication buffer.
    pub mm_buffer_size: u64,
    /// Custom initial memory region for the PEI phase, if the platform
    /// needs one.
    pub pei_memory: Option<MemoryWindow>,
}

impl PlatformConfig {
    /// Defaults for the QEMU SBSA reference machine.
    pub const QEMU_SBSA: Self = Self {
        system_memory_base: PhysAddr::new(0x100_0000_0000),
        system_memory_size: 0x4000_0000,
        fd_base: PhysAddr::new(0x1000_0000),
        fd_size: 0x0030_0000,
        mm_buffer_base: PhysAddr::new(0x100_3FE0_0000),
        mm_buffer_size: 0x0020_0000,
        pei_memory: None,
    };

    /// Replace the system DRAM window.
    pub const fn with_system_memory(mut self, base: u64, size: u64) -> Self {
        self.system_memory_base = PhysAddr::new(base);
        self.system_memory_size = size;
        self
    }

    /// Replace the firmware volume window.
    pub const fn with_firmware_volume(mut self, base: u64, size: u32) -> Self {
        self.fd_base = PhysAddr::new(base);
        self.fd_size = size;
        self
    }

    /// Replace the MM communication buffer window.
    pub const fn with_mm_buffer(mut self, base: u64, size: u64) -> Self {
        self.mm_buffer_base = PhysAddr::new(base);
        self.mm_buffer_size = size;
        self
    }

    /// Request a custom initial PEI memory region.
    pub const fn with_pei_memory(mut self, base: u64, size: u64) -> Self {
        self.pei_memory = Some(MemoryWindow::new(base, size));
        self
    }

    /// The custom initial PEI memory region, or `None` to let the generic
    /// PEI core pick one from system DRAM.
    pub fn pei_memory(&self) -> Option<MemoryWindow> {
        self.pei_memory
    }

    /// Check that every window produces a usable, non-zero table entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Entry 1 spans [0, system_memory_base) and must not be empty.
        if self.system_memory_base == PhysAddr::ZERO {
            return Err(ConfigError::ZeroSize(Window::LowPeripherals));
        }

        let windows = [
            (Window::SystemMemory, self.system_memory_base, self.system_memory_size),
            (Window::FirmwareVolume, self.fd_base, u64::from(self.fd_size)),
            (Window::MmBuffer, self.mm_buffer_base, self.mm_buffer_size),
        ];

        for (window, base, size) in windows {
            if size == 0 {
                return Err(ConfigError::ZeroSize(window));
            }
            if base.checked_add(size).is_none() {
                return Err(ConfigError::Overflow(window));
            }
            if !base.is_aligned() || size & PAGE_MASK != 0 {
                return Err(ConfigError::Misaligned(window));
            }
        }

        if let Some(pei) = self.pei_memory {
            if pei.size == 0 {
                return Err(ConfigError::ZeroSize(Window::PeiMemory));
            }
            if pei.base.checked_add(pei.size).is_none() {
                return Err(ConfigError::Overflow(Window::PeiMemory));
            }
        }

        Ok(())
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::QEMU_SBSA
    }
}

/// Names the configured window a [`ConfigError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    SystemMemory,
    LowPeripherals,
    FirmwareVolume,
    MmBuffer,
    PeiMemory,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemMemory => write!(f, "system memory"),
            Self::LowPeripherals => write!(f, "low peripheral space"),
            Self::FirmwareVolume => write!(f, "firmware volume"),
            Self::MmBuffer => write!(f, "MM buffer"),
            Self::PeiMemory => write!(f, "PEI memory"),
        }
    }
}

/// Error type for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The window has zero length.
    ZeroSize(Window),
    /// base + size wraps the address space.
    Overflow(Window),
    /// Base or size is not a multiple of the translation granule.
    Misaligned(Window),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize(w) => write!(f, "{} window has zero size", w),
            Self::Overflow(w) => write!(f, "{} window overflows the address space", w),
            Self::Misaligned(w) => write!(f, "{} window is not page aligned", w),
        }
    }
}

/// Configuration read by the C entry point.
static ACTIVE_CONFIG: Mutex<PlatformConfig> = Mutex::new(PlatformConfig::QEMU_SBSA);

/// Install the configuration used by the C entry point.
pub fn set_active_config(config: PlatformConfig) {
    *ACTIVE_CONFIG.lock() = config;
}

/// The configuration used by the C entry point.
pub fn active_config() -> PlatformConfig {
    *ACTIVE_CONFIG.lock()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(PlatformConfig::default().validate(), Ok(()));
        assert_eq!(PlatformConfig::QEMU_SBSA.pei_memory(), None);
    }

    #[test]
    fn test_zero_dram_base_rejected() {
        let config = PlatformConfig::QEMU_SBSA.with_system_memory(0, 0x4000_0000);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroSize(Window::LowPeripherals))
        );
    }

    #[test]
    fn test_zero_sized_windows_rejected() {
        let config = PlatformConfig::QEMU_SBSA.with_mm_buffer(0x7e00_0000, 0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSize(Window::MmBuffer)));

        let config = PlatformConfig::QEMU_SBSA.with_firmware_volume(0x1000_0000, 0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroSize(Window::FirmwareVolume))
        );
    }

    #[test]
    fn test_overflow_rejected() {
        let config = PlatformConfig::QEMU_SBSA.with_system_memory(0xFFFF_0000_0000, 0xFFFF_FFFF_FFFF_F000);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Overflow(Window::SystemMemory))
        );
    }

    #[test]
    fn test_misaligned_rejected() {
        let config = PlatformConfig::QEMU_SBSA.with_mm_buffer(0x7e00_0800, 0x20_0000);
        assert_eq!(config.validate(), Err(ConfigError::Misaligned(Window::MmBuffer)));
    }

    #[test]
    fn test_pei_memory_override() {
        let config = PlatformConfig::QEMU_SBSA.with_pei_memory(0x100_0000_0000, 0x400_0000);
        assert_eq!(
            config.pei_memory(),
            Some(MemoryWindow::new(0x100_0000_0000, 0x400_0000))
        );
        assert_eq!(config.validate(), Ok(()));
    }
}
