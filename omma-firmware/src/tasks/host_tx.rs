//! Host link transmit task
//!
//! Drains the outbound queue (touch events, heartbeat responses) and
//! sends the encoded frames to the host.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::OUTBOUND;

/// Host TX task - sends device messages to the host
#[embassy_executor::task]
pub async fn host_tx_task(mut tx: BufferedUartTx<'static, UART0>) {
    info!("Host TX task started");

    // Outbound messages carry no payload, so a small buffer suffices
    let mut buf = [0u8; 16];

    loop {
        let message = OUTBOUND.receive().await;
        let frame = message.to_frame();

        match frame.encode(&mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("Failed to send {:?}: {:?}", message, e);
                } else {
                    trace!("Sent {:?}", message);
                }
            }
            Err(e) => {
                warn!("Failed to encode {:?}: {:?}", message, e);
            }
        }
    }
}
