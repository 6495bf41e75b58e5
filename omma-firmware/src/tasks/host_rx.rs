//! Host link receive task
//!
//! Receives frames from the host, decodes their hex payloads, and
//! dispatches render/sound jobs to the worker tasks.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartRx;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embedded_io_async::Read;

use omma_protocol::{
    hex, DeviceMessage, FrameParamReader, FrameParser, HostCommand, ToneReader, MAX_PAYLOAD_SIZE,
};

use crate::channels::{
    AnimationJob, SoundJob, ANIMATION_JOBS, JOB_QUEUE_SIZE, MAX_ANIMATION_FRAMES, OUTBOUND,
    SOUND_JOBS,
};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Decoded payload capacity (hex halves the payload size)
const DECODED_CAPACITY: usize = MAX_PAYLOAD_SIZE / 2;

/// Host RX task - receives and parses frames from the host
#[embassy_executor::task]
pub async fn host_rx_task(mut rx: BufferedUartRx<'static, UART0>) {
    info!("Host RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        // Read available bytes
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                // Feed bytes to parser
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => {
                            // Parse the host command
                            match HostCommand::from_frame(&frame) {
                                Ok(cmd) => {
                                    handle_host_command(cmd);
                                }
                                Err(e) => {
                                    warn!("Failed to parse host command: {:?}", e);
                                }
                            }
                        }
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Handle a parsed host command
fn handle_host_command(cmd: HostCommand<'_>) {
    match cmd {
        HostCommand::Draw { params_hex } => {
            let decoded = match hex::decode::<DECODED_CAPACITY>(params_hex) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!("Animation payload is not valid hex: {:?}", e);
                    return;
                }
            };

            let mut job = AnimationJob::new();
            for params in FrameParamReader::new(&decoded) {
                if job.push(params).is_err() {
                    warn!(
                        "Animation request beyond {} frames, extras dropped",
                        MAX_ANIMATION_FRAMES
                    );
                    break;
                }
            }

            debug!("Animation request: {} frames", job.len());
            submit_newest(&ANIMATION_JOBS, job);
        }
        HostCommand::Play { tones_hex } => {
            let decoded = match hex::decode::<DECODED_CAPACITY>(tones_hex) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!("Sound payload is not valid hex: {:?}", e);
                    return;
                }
            };

            let mut job = SoundJob::new();
            for tone in ToneReader::new(&decoded) {
                if job.push(tone).is_err() {
                    warn!("Sound request too long, extra tones dropped");
                    break;
                }
            }

            debug!("Sound request: {} tones", job.len());
            submit_newest(&SOUND_JOBS, job);
        }
        HostCommand::Ping => {
            trace!("PING received");
            if OUTBOUND.try_send(DeviceMessage::Pong).is_err() {
                warn!("Outbound queue full, dropping PONG");
            }
        }
    }
}

/// Queue a job, evicting a stale waiting one if the queue is full.
/// A request arriving while another still waits replaces it.
fn submit_newest<T>(channel: &Channel<CriticalSectionRawMutex, T, JOB_QUEUE_SIZE>, job: T) {
    if let Err(TrySendError::Full(job)) = channel.try_send(job) {
        let _ = channel.try_receive();
        let _ = channel.try_send(job);
    }
}
