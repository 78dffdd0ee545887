//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod console_tx;
pub mod scanner;
pub mod sweep;
pub mod turntable;

pub use console_tx::console_tx_task;
pub use scanner::scanner_task;
pub use sweep::sweep_task;
pub use turntable::turntable_task;

use embassy_time::Timer;

/// Park the calling task forever
///
/// Other tasks keep running, so queued console lines still drain.
pub async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
    }
}
