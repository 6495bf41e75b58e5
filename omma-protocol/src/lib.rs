//! Host Link Protocol for the Omma Eyes Display
//!
//! This crate defines the UART-based protocol between a host (the
//! companion-app bridge) and the Omma display module. The host pushes
//! animation and sound requests; the module reports touch events back.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬──────────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH (LE)  │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 2B           │ 1B   │ 0–1024B     │ 1B       │
//! └───────┴──────────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Animation and sound payloads are lowercase hex text, exactly as the
//! host tooling produces them: `Draw` carries concatenated 20-byte
//! frame-parameter records (five little-endian `f32` values each), `Play`
//! carries big-endian `(frequency_hz, duration_ms)` u16 pairs. The module
//! acts as a "dumb face": it renders what it is told and keeps no
//! animation state between requests.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod hex;
pub mod messages;
pub mod params;
pub mod tones;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use hex::HexError;
pub use messages::{DeviceMessage, HostCommand};
pub use params::{FrameParamReader, FrameParams, FRAME_RECORD_BYTES, PARAMS_PER_FRAME};
pub use tones::{Tone, ToneReader, TONE_RECORD_BYTES};
