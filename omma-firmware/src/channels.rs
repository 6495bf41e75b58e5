//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy
//! tasks. Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use omma_protocol::{DeviceMessage, FrameParams, Tone};

/// Maximum open-eye frames per animation request; extras are dropped
pub const MAX_ANIMATION_FRAMES: usize = 20;

/// Maximum tones per sound request
pub const MAX_TONES: usize = 128;

/// Queue depth for animation/sound jobs; the newest request wins when full
pub const JOB_QUEUE_SIZE: usize = 2;

/// Queue depth for outbound host messages
const OUTBOUND_QUEUE_SIZE: usize = 4;

/// A decoded animation request
pub type AnimationJob = Vec<FrameParams, MAX_ANIMATION_FRAMES>;

/// A decoded sound request
pub type SoundJob = Vec<Tone, MAX_TONES>;

/// Animation requests from the host link to the animation task
pub static ANIMATION_JOBS: Channel<CriticalSectionRawMutex, AnimationJob, JOB_QUEUE_SIZE> =
    Channel::new();

/// Sound requests from the host link to the buzzer task
pub static SOUND_JOBS: Channel<CriticalSectionRawMutex, SoundJob, JOB_QUEUE_SIZE> = Channel::new();

/// Messages queued for the host (touch events, heartbeat responses)
pub static OUTBOUND: Channel<CriticalSectionRawMutex, DeviceMessage, OUTBOUND_QUEUE_SIZE> =
    Channel::new();
