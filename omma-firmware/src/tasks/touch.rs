//! Touch input task
//!
//! Debounces the touch pad and reports presses to the host. The host
//! decides how to react (typically by sending back a wake-up animation).

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Timer};

use omma_protocol::DeviceMessage;

use crate::channels::OUTBOUND;

/// Settle time after an edge before sampling the pad
const SETTLE_MS: u64 = 20;

/// Minimum gap between reported touches
const DEBOUNCE: Duration = Duration::from_millis(2000);

/// Touch task - reports debounced pad presses
#[embassy_executor::task]
pub async fn touch_task(mut pad: Input<'static>) {
    info!("Touch task started");

    let mut last_touch: Option<Instant> = None;

    loop {
        pad.wait_for_falling_edge().await;

        // Settle, then confirm the pad is still pressed
        Timer::after_millis(SETTLE_MS).await;
        if pad.is_high() {
            continue;
        }

        if last_touch.is_some_and(|t| t.elapsed() < DEBOUNCE) {
            trace!("Touch ignored (debounce)");
            continue;
        }
        last_touch = Some(Instant::now());

        debug!("Touch detected");
        if OUTBOUND.try_send(DeviceMessage::Touch).is_err() {
            warn!("Outbound queue full, dropping touch event");
        }
    }
}
