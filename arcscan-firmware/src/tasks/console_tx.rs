//! Console UART transmit task
//!
//! Drains the console channel and writes each rendered line to UART0.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::CONSOLE;
use crate::console::render;

/// Console TX task - writes status lines to the serial console
#[embassy_executor::task]
pub async fn console_tx_task(mut tx: BufferedUartTx<'static, UART0>) {
    info!("Console TX task started");

    loop {
        let line = CONSOLE.receive().await;
        let text = render(&line);
        if let Err(e) = tx.write_all(text.as_bytes()).await {
            warn!("Failed to write console line: {:?}", e);
        }
    }
}
