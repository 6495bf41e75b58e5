//! Animation playback task
//!
//! Owns the eye renderer and the OLED. Each animation request plays as a
//! full blink sequence (closed, half-open, the open frames, half-open,
//! closed); the display then rests on the final closed frame until the
//! next request. A request arriving mid-sequence replaces the running one
//! between frames.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C1;
use embassy_time::Timer;

use omma_core::{BlinkSequence, EyeGeometry, EyeRenderer, FrameBuffer};

use crate::channels::{AnimationJob, ANIMATION_JOBS};
use crate::ssd1306::Ssd1306;

/// Hold time for each animation state
const FRAME_HOLD_MS: u64 = 100;

/// Hold time for the final closed frame
const FINAL_HOLD_MS: u64 = 200;

type Display = Ssd1306<I2c<'static, I2C1, Async>>;

/// Animation task - renders blink sequences to the OLED
#[embassy_executor::task]
pub async fn animation_task(mut display: Display) {
    info!("Animation task started");

    let mut renderer = EyeRenderer::new(EyeGeometry::default());
    let mut frame = FrameBuffer::new();

    // Resting face until the first request arrives
    renderer.render_closed(&mut frame);
    show(&mut display, &frame).await;

    let mut job = ANIMATION_JOBS.receive().await;
    loop {
        job = match play(&mut renderer, &mut frame, &mut display, &job).await {
            // A new request arrived mid-sequence and replaces this one
            Some(next) => next,
            None => ANIMATION_JOBS.receive().await,
        };
    }
}

/// Play one blink sequence
///
/// Returns early with the replacement job if a new request arrives
/// between frames.
async fn play(
    renderer: &mut EyeRenderer,
    frame: &mut FrameBuffer,
    display: &mut Display,
    job: &AnimationJob,
) -> Option<AnimationJob> {
    let mut sequence = BlinkSequence::new(job).enumerate().peekable();

    while let Some((step, expression)) = sequence.next() {
        renderer.render(&expression, frame);
        show(display, frame).await;

        let hold = if sequence.peek().is_none() {
            FINAL_HOLD_MS
        } else {
            FRAME_HOLD_MS
        };
        Timer::after_millis(hold).await;

        if let Ok(next) = ANIMATION_JOBS.try_receive() {
            debug!("Animation preempted at step {}", step);
            return Some(next);
        }
    }

    None
}

/// Push one rendered frame to the display
async fn show(display: &mut Display, frame: &FrameBuffer) {
    display.draw_frame(frame);
    if let Err(e) = display.flush().await {
        warn!("Display flush failed: {:?}", e);
    }
}
