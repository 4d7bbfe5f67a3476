//! Device drivers used during early boot
//!
//! Only the serial console is needed: it carries the firmware's log output.

pub mod uart;

pub use uart::{init_logger, UartLogger, UART};
