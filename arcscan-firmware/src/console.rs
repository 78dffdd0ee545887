//! Serial console output
//!
//! Tasks queue [`ConsoleLine`]s; the console TX task renders them to text.

use core::fmt::Write;

use arcscan_core::console::ConsoleLine;
use portable_atomic::{AtomicU32, Ordering};

use crate::channels::CONSOLE;

/// Longest rendered console line, terminator included
pub const MAX_LINE_LEN: usize = 128;

/// Lines discarded because the console channel was full
static DROPPED_LINES: AtomicU32 = AtomicU32::new(0);

/// Queue a status line, waiting for room in the channel
pub async fn emit(line: ConsoleLine) {
    CONSOLE.send(line).await;
}

/// Queue a line without waiting; drops it if the channel is full
///
/// Used for bulk point output, where stalling the scan is worse than
/// losing a line.
pub fn try_emit(line: ConsoleLine) -> bool {
    if CONSOLE.try_send(line).is_err() {
        DROPPED_LINES.fetch_add(1, Ordering::Relaxed);
        return false;
    }
    true
}

/// Number of lines dropped since boot
pub fn dropped_lines() -> u32 {
    DROPPED_LINES.load(Ordering::Relaxed)
}

/// Render a line with its terminator
///
/// Text that does not fit is cut short; the terminator is always kept.
pub fn render(line: &ConsoleLine) -> heapless::String<MAX_LINE_LEN> {
    let mut out: heapless::String<MAX_LINE_LEN> = heapless::String::new();
    // overflow keeps whatever fit
    let _ = write!(out, "{}", line);
    if line.is_terminated() {
        while out.len() > MAX_LINE_LEN - 2 {
            out.pop();
        }
        let _ = out.push_str("\r\n");
    }
    out
}
