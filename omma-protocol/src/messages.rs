//! Message types for the Omma host link
//!
//! Message types are divided into two categories:
//! - Host → Device: animation and sound requests, heartbeat requests
//! - Device → Host: touch events, heartbeat responses

use crate::frame::{Frame, FrameError};

// Message type IDs: Host → Device
pub const MSG_PING: u8 = 0x01;
pub const MSG_DRAW: u8 = 0x10;
pub const MSG_PLAY: u8 = 0x11;

// Message type IDs: Device → Host
pub const MSG_PONG: u8 = 0x21;
pub const MSG_TOUCH: u8 = 0x22;

/// Commands from the host to the display module
///
/// `Draw` and `Play` borrow their hex payload from the parsed frame; the
/// receiver decodes it and drops the frame before the next one arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand<'a> {
    /// Render an eye animation (payload: hex frame-parameter records)
    Draw { params_hex: &'a [u8] },
    /// Play a tone sequence on the buzzer (payload: hex tone records)
    Play { tones_hex: &'a [u8] },
    /// Heartbeat request
    Ping,
}

impl<'a> HostCommand<'a> {
    /// Parse a command from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_DRAW => Ok(HostCommand::Draw {
                params_hex: &frame.payload,
            }),
            MSG_PLAY => Ok(HostCommand::Play {
                tones_hex: &frame.payload,
            }),
            MSG_PING => Ok(HostCommand::Ping),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this command into a frame (host side, also used in tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            HostCommand::Draw { params_hex } => Frame::new(MSG_DRAW, params_hex),
            HostCommand::Play { tones_hex } => Frame::new(MSG_PLAY, tones_hex),
            HostCommand::Ping => Ok(Frame::empty(MSG_PING)),
        }
    }
}

/// Messages from the display module to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// The touch pad was pressed
    Touch,
    /// Heartbeat response
    Pong,
}

impl DeviceMessage {
    /// Parse a message from a frame (host side)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_TOUCH => Ok(DeviceMessage::Touch),
            MSG_PONG => Ok(DeviceMessage::Pong),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Frame {
        match self {
            DeviceMessage::Touch => Frame::empty(MSG_TOUCH),
            DeviceMessage::Pong => Frame::empty(MSG_PONG),
        }
    }
}
