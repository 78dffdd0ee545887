//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use arcscan_core::console::ConsoleLine;
use arcscan_core::scanner::ScanProgress;

/// Channel capacity for console lines
const CONSOLE_CHANNEL_SIZE: usize = 32;

/// Status lines waiting to be written to the serial console
pub static CONSOLE: Channel<CriticalSectionRawMutex, ConsoleLine, CONSOLE_CHANNEL_SIZE> =
    Channel::new();

/// Latest coordinated scan progress (updated by scanner task)
pub static SCAN_PROGRESS: Signal<CriticalSectionRawMutex, ScanProgress> = Signal::new();
