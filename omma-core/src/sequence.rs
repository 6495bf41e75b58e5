//! Blink sequencing
//!
//! An animation request is a list of open-eye frames; playback wraps it in
//! a fixed lead-in and lead-out: the eyes close, crack half-open, play the
//! open frames, then reverse. Inter-frame timing belongs to the caller;
//! this module only produces the ordered states.

use omma_protocol::FrameParams;

/// One renderable eye state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EyeExpression {
    /// Eyes fully closed (flat bars)
    Closed,
    /// Fixed half-open slit
    HalfOpen,
    /// Fully open, with per-frame expression parameters
    Open(FrameParams),
}

/// Iterator over the full blink sequence for a set of open frames
///
/// Yields closed, half-open, one open state per frame, half-open, closed.
/// An empty frame list still yields the four lead-in/lead-out states.
#[derive(Debug, Clone)]
pub struct BlinkSequence<'a> {
    frames: &'a [FrameParams],
    step: usize,
}

impl<'a> BlinkSequence<'a> {
    /// Create the sequence for the given open-eye frames
    pub fn new(frames: &'a [FrameParams]) -> Self {
        Self { frames, step: 0 }
    }
}

impl Iterator for BlinkSequence<'_> {
    type Item = EyeExpression;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.frames.len();
        let expression = match self.step {
            0 => EyeExpression::Closed,
            1 => EyeExpression::HalfOpen,
            s if s < n + 2 => EyeExpression::Open(self.frames[s - 2]),
            s if s == n + 2 => EyeExpression::HalfOpen,
            s if s == n + 3 => EyeExpression::Closed,
            _ => return None,
        };
        self.step += 1;
        Some(expression)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.frames.len() + 4).saturating_sub(self.step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BlinkSequence<'_> {}
