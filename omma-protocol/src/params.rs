//! Frame-parameter records for eye animations.
//!
//! An animation request is a concatenation of fixed-size records, one per
//! open-eye frame. Each record is five little-endian `f32` values in the
//! order `[pupil_y, pupil_x, eyebrows_low, pupil_size, eyebrow_angle]`.
//! A trailing partial record is ignored.

/// Number of parameters per animation frame
pub const PARAMS_PER_FRAME: usize = 5;

/// Size of one frame-parameter record in bytes
pub const FRAME_RECORD_BYTES: usize = PARAMS_PER_FRAME * core::mem::size_of::<f32>();

/// Expression parameters for one open-eye frame
///
/// Gaze offsets are nominally -1.0..=1.0, `eyebrows_low` and `pupil_size`
/// nominally 0.0..=1.0, `eyebrow_angle` in degrees. The renderer clamps the
/// eyebrow angle but deliberately extrapolates the pupil radius for
/// out-of-range sizes, so no range checking happens here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameParams {
    /// Vertical gaze offset (-1.0 top to 1.0 bottom)
    pub pupil_y: f32,
    /// Horizontal gaze offset (-1.0 left to 1.0 right)
    pub pupil_x: f32,
    /// Eyebrow lowering fraction (0.0 raised, 1.0 fully lowered)
    pub eyebrows_low: f32,
    /// Pupil dilation fraction (0.0 smallest, 1.0 largest)
    pub pupil_size: f32,
    /// Eyebrow tilt in degrees (negative angry, positive surprised)
    pub eyebrow_angle: f32,
}

impl FrameParams {
    /// Decode one record from its wire representation
    pub fn from_bytes(bytes: &[u8; FRAME_RECORD_BYTES]) -> Self {
        let field = |i: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
            f32::from_le_bytes(raw)
        };

        Self {
            pupil_y: field(0),
            pupil_x: field(1),
            eyebrows_low: field(2),
            pupil_size: field(3),
            eyebrow_angle: field(4),
        }
    }

    /// Encode this record to its wire representation (host-side helper)
    pub fn to_bytes(&self) -> [u8; FRAME_RECORD_BYTES] {
        let mut out = [0u8; FRAME_RECORD_BYTES];
        let fields = [
            self.pupil_y,
            self.pupil_x,
            self.eyebrows_low,
            self.pupil_size,
            self.eyebrow_angle,
        ];
        for (chunk, value) in out.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }
}

/// Iterator over the frame-parameter records in a decoded payload
///
/// Yields one `FrameParams` per complete record; bytes after the last
/// complete record are silently dropped.
#[derive(Debug, Clone)]
pub struct FrameParamReader<'a> {
    data: &'a [u8],
}

impl<'a> FrameParamReader<'a> {
    /// Create a reader over a decoded animation payload
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of complete records remaining
    pub fn remaining(&self) -> usize {
        self.data.len() / FRAME_RECORD_BYTES
    }
}

impl<'a> Iterator for FrameParamReader<'a> {
    type Item = FrameParams;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < FRAME_RECORD_BYTES {
            return None;
        }

        let (record, rest) = self.data.split_at(FRAME_RECORD_BYTES);
        self.data = rest;

        // Slice is exactly FRAME_RECORD_BYTES long, conversion cannot fail
        let record: &[u8; FRAME_RECORD_BYTES] = record.try_into().ok()?;
        Some(FrameParams::from_bytes(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for FrameParamReader<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: [f32; PARAMS_PER_FRAME]) -> [u8; FRAME_RECORD_BYTES] {
        let mut out = [0u8; FRAME_RECORD_BYTES];
        for (chunk, value) in out.chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_field_order() {
        let bytes = record([0.25, -0.5, 1.0, 0.3, -7.5]);
        let params = FrameParams::from_bytes(&bytes);

        assert_eq!(params.pupil_y, 0.25);
        assert_eq!(params.pupil_x, -0.5);
        assert_eq!(params.eyebrows_low, 1.0);
        assert_eq!(params.pupil_size, 0.3);
        assert_eq!(params.eyebrow_angle, -7.5);
    }

    #[test]
    fn test_to_bytes_roundtrip() {
        let params = FrameParams {
            pupil_y: -1.0,
            pupil_x: 0.75,
            eyebrows_low: 0.1,
            pupil_size: 0.9,
            eyebrow_angle: 10.0,
        };
        assert_eq!(FrameParams::from_bytes(&params.to_bytes()), params);
    }

    #[test]
    fn test_reader_yields_each_record() {
        let mut data = [0u8; FRAME_RECORD_BYTES * 2];
        data[..FRAME_RECORD_BYTES].copy_from_slice(&record([0.0, 0.0, 0.0, 0.5, 0.0]));
        data[FRAME_RECORD_BYTES..].copy_from_slice(&record([1.0, 1.0, 1.0, 1.0, 5.0]));

        let mut reader = FrameParamReader::new(&data);
        assert_eq!(reader.remaining(), 2);

        let first = reader.next().unwrap();
        assert_eq!(first.pupil_size, 0.5);

        let second = reader.next().unwrap();
        assert_eq!(second.eyebrow_angle, 5.0);

        assert!(reader.next().is_none());
    }

    #[test]
    fn test_reader_ignores_trailing_partial_record() {
        let mut data = [0u8; FRAME_RECORD_BYTES + 7];
        data[..FRAME_RECORD_BYTES].copy_from_slice(&record([0.0, 0.0, 0.0, 0.0, 0.0]));

        let reader = FrameParamReader::new(&data);
        assert_eq!(reader.count(), 1);
    }

    #[test]
    fn test_reader_empty_payload() {
        let reader = FrameParamReader::new(&[]);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.count(), 0);
    }
}
