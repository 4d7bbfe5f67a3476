//! PL011 UART console and `log` backend
//!
//! Serial console for firmware diagnostics on the SBSA reference machine.
//!
//! # Memory Map
//! - Base address: 0x6000_0000 (the UART platform window)
//! - Register size: 0x1000 bytes

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

use crate::resource::windows::UART_BASE;

/// PL011 Register offsets
mod regs {
    /// Data Register - read/write data
    pub const DR: usize = 0x00;
    /// Flag Register - status flags
    pub const FR: usize = 0x18;
}

/// Flag Register bits
mod flags {
    /// Transmit FIFO full
    pub const TXFF: u32 = 1 << 5;
}

/// PL011 UART driver
pub struct Uart {
    base: usize,
    initialized: bool,
}

impl Uart {
    /// Create a new UART instance (not yet initialized). Writes are dropped
    /// until [`Uart::init`] runs.
    pub const fn new(base: usize) -> Self {
        Self {
            base,
            initialized: false,
        }
    }

    /// Initialize the UART
    ///
    /// # Safety
    /// The base address must be identity mapped as device memory (or the
    /// MMU must be off), and nothing else may drive the UART.
    pub unsafe fn init(&mut self) {
        // Firmware earlier in the boot chain has already programmed the
        // baud rate and enabled the transmitter.
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn write_byte(&self, byte: u8) {
        if !self.initialized {
            return;
        }

        // SAFETY: `init` established that the registers are mapped and owned
        // by this driver.
        unsafe {
            let fr = (self.base + regs::FR) as *const u32;
            let dr = (self.base + regs::DR) as *mut u32;

            while core::ptr::read_volatile(fr) & flags::TXFF != 0 {
                core::hint::spin_loop();
            }

            core::ptr::write_volatile(dr, byte as u32);
        }
    }

    /// Write a string to the UART
    pub fn write_str(&self, s: &str) {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
    }
}

impl Write for Uart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Uart::write_str(self, s);
        Ok(())
    }
}

/// Global UART instance protected by spinlock
pub static UART: Mutex<Uart> = Mutex::new(Uart::new(UART_BASE as usize));

/// `log` backend writing to [`UART`].
pub struct UartLogger;

impl Log for UartLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut uart = UART.lock();
        let _ = writeln!(uart, "[{:<5}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: UartLogger = UartLogger;

/// Initialize the console and route `log` records to it.
///
/// # Safety
/// Same contract as [`Uart::init`].
pub unsafe fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    // SAFETY: forwarded from this function's contract.
    unsafe { UART.lock().init() };
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_targets_uart_window() {
        assert_eq!(UART.lock().base, 0x6000_0000);
    }

    #[test]
    fn test_uninitialized_uart_drops_output() {
        // Never touches MMIO because the UART was not initialized.
        let uart = Uart::new(0x6000_0000);
        assert!(!uart.is_initialized());
        uart.write_str("dropped\n");
    }
}
