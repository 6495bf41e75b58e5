//! Expression compositors
//!
//! Three render paths produce the packed face bitmap: a parametric open
//! state, and the fixed half-open and closed states used as blink lead-in
//! and lead-out. Every path overwrites the caller's buffer completely, so
//! no stale pixels survive between frames.
//!
//! The open state composites in layers: the cached sclera mask is copied
//! in as the base, an iris-sized disk is carved dark at the gaze-shifted
//! center, the pupil is filled back in on top, and finally everything
//! above the tilted eyebrow baseline is cleared away.

use omma_protocol::FrameParams;

use crate::bitmap::FrameBuffer;
use crate::geometry::EyeGeometry;
use crate::math::{round_nearest, tan_deg};
use crate::sclera::ScleraMask;
use crate::sequence::EyeExpression;

/// Pupil dilation fraction used by the half-open state
const HALF_OPEN_PUPIL_SIZE: f32 = 0.3;

/// Stateful eye renderer
///
/// Owns the geometry and the lazily generated sclera mask. The mask is
/// built by the first open-state render and reused for every one after;
/// exclusive access through `&mut self` guarantees it is generated
/// exactly once per renderer.
pub struct EyeRenderer {
    geometry: EyeGeometry,
    sclera: Option<ScleraMask>,
}

impl EyeRenderer {
    /// Create a renderer with the given geometry
    pub fn new(geometry: EyeGeometry) -> Self {
        Self {
            geometry,
            sclera: None,
        }
    }

    /// The geometry this renderer draws with
    pub fn geometry(&self) -> &EyeGeometry {
        &self.geometry
    }

    /// Whether the sclera mask has been generated yet
    pub fn sclera_cached(&self) -> bool {
        self.sclera.is_some()
    }

    /// Render one expression into the caller's buffer
    pub fn render(&mut self, expression: &EyeExpression, frame: &mut FrameBuffer) {
        match expression {
            EyeExpression::Closed => self.render_closed(frame),
            EyeExpression::HalfOpen => self.render_half_open(frame),
            EyeExpression::Open(params) => self.render_open(params, frame),
        }
    }

    /// Render fully open eyes with the given expression parameters
    ///
    /// The eyebrow angle is clamped to the configured limit. The pupil
    /// radius is deliberately not clamped: out-of-range `pupil_size`
    /// extrapolates it linearly, and a non-positive radius draws no pupil
    /// at all. Hosts depend on this asymmetry.
    pub fn render_open(&mut self, params: &FrameParams, frame: &mut FrameBuffer) {
        let g = self.geometry;
        self.sclera
            .get_or_insert_with(|| ScleraMask::generate(&g))
            .copy_into(frame);

        let pupil_r = g.pupil_radius(params.pupil_size);

        for eye in 0..2 {
            let ecx = g.eye_center_x(eye);

            let iris_cx = ecx as f32 + params.pupil_x * g.iris_shift_x;
            let iris_cy = g.eye_center_y as f32 + params.pupil_y * g.iris_shift_y;

            let brow_base =
                g.eyebrow_y_base + (params.eyebrows_low * g.eyebrow_y_range as f32) as i32;
            // The right eyebrow mirrors the tilt so the face stays symmetric
            let angle = if eye == 1 {
                -params.eyebrow_angle
            } else {
                params.eyebrow_angle
            };
            let angle = angle.clamp(-g.eyebrow_angle_limit, g.eyebrow_angle_limit);
            let slope = tan_deg(angle);

            self.carve_iris(iris_cx, iris_cy, frame);
            self.fill_pupil(iris_cx, iris_cy, pupil_r, frame);
            self.occlude_eyebrow(ecx, brow_base, slope, frame);
        }
    }

    /// Render the fixed half-open blink state
    ///
    /// Gaze is centered and the pupil sits at a small fixed dilation. The
    /// eye disks are recomputed inline rather than copied from the sclera
    /// mask: the eyelid band filters pixels before the iris and pupil
    /// compositing, so the cached bytes would not match.
    pub fn render_half_open(&self, frame: &mut FrameBuffer) {
        frame.clear();
        let g = self.geometry;

        let pupil_r = g.pupil_radius(HALF_OPEN_PUPIL_SIZE);
        let iris_r2 = (g.iris_r * g.iris_r) as f32;

        for eye in 0..2 {
            let ecx = g.eye_center_x(eye);
            let iris_cx = ecx as f32;
            let iris_cy = g.eye_center_y as f32;

            for y in g.upper_eyelid_y..=g.lower_eyelid_y {
                for x in ecx - g.eye_r..=ecx + g.eye_r {
                    let dx = (x - ecx) as f32 / g.eye_r as f32;
                    let dy = (y - g.eye_center_y) as f32 / g.eye_r as f32;
                    if dx * dx + dy * dy > 1.0 {
                        continue;
                    }

                    let dx_iris = x as f32 - iris_cx;
                    let dy_iris = y as f32 - iris_cy;
                    let dist2 = dx_iris * dx_iris + dy_iris * dy_iris;

                    // Sclera outside the iris, pupil inside it; the iris
                    // ring itself stays dark
                    if dist2 > iris_r2 || dist2 <= pupil_r * pupil_r {
                        frame.set(x, y);
                    }
                }
            }
        }
    }

    /// Render the fixed closed-eye state: one flat bar per eye
    pub fn render_closed(&self, frame: &mut FrameBuffer) {
        frame.clear();
        let g = self.geometry;

        for eye in 0..2 {
            let ecx = g.eye_center_x(eye);
            for y in g.closed_eye_y..g.closed_eye_y + g.closed_eye_thickness {
                for x in ecx - g.closed_eye_length / 2..ecx + g.closed_eye_length / 2 {
                    frame.set(x, y);
                }
            }
        }
    }

    /// Darken every pixel within the iris radius of the gaze center
    fn carve_iris(&self, cx: f32, cy: f32, frame: &mut FrameBuffer) {
        let r = self.geometry.iris_r;
        let icx = round_nearest(cx);
        let icy = round_nearest(cy);

        for y in icy - r..=icy + r {
            for x in icx - r..=icx + r {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= (r * r) as f32 {
                    frame.unset(x, y);
                }
            }
        }
    }

    /// Light every pixel within `radius` of the gaze center
    fn fill_pupil(&self, cx: f32, cy: f32, radius: f32, frame: &mut FrameBuffer) {
        if radius <= 0.0 {
            return;
        }

        let reach = radius as i32 + 1;
        let icx = round_nearest(cx);
        let icy = round_nearest(cy);

        for y in icy - reach..=icy + reach {
            for x in icx - reach..=icx + reach {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    frame.set(x, y);
                }
            }
        }
    }

    /// Darken everything above the tilted eyebrow baseline
    ///
    /// The baseline slides down by `slope` pixels per column of horizontal
    /// offset from the eye center, rounded per column.
    fn occlude_eyebrow(&self, ecx: i32, base: i32, slope: f32, frame: &mut FrameBuffer) {
        let r = self.geometry.eye_r;

        for x_offset in -r..=r {
            let x = ecx + x_offset;
            let cutoff = base + round_nearest(slope * x_offset as f32);
            for y in 0..cutoff {
                frame.unset(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{FRAME_HEIGHT, FRAME_WIDTH};
    use proptest::prelude::*;

    fn renderer() -> EyeRenderer {
        EyeRenderer::new(EyeGeometry::default())
    }

    fn open_frame(params: &FrameParams) -> FrameBuffer {
        let mut frame = FrameBuffer::new();
        renderer().render_open(params, &mut frame);
        frame
    }

    fn centered(pupil_size: f32) -> FrameParams {
        FrameParams {
            pupil_size,
            ..Default::default()
        }
    }

    #[test]
    fn test_closed_draws_exactly_two_bars() {
        let mut frame = FrameBuffer::new();
        renderer().render_closed(&mut frame);

        // 2 bars x 40 px x 2 rows
        assert_eq!(frame.count_set(), 160);

        for ecx in [32, 96] {
            assert!(frame.get(ecx - 20, 32));
            assert!(frame.get(ecx + 19, 33));
            assert!(!frame.get(ecx - 21, 32));
            assert!(!frame.get(ecx + 20, 32));
            assert!(!frame.get(ecx, 31));
            assert!(!frame.get(ecx, 34));
        }
    }

    #[test]
    fn test_closed_overwrites_stale_content() {
        let mut dirty = FrameBuffer::new();
        for y in 0..FRAME_HEIGHT {
            for x in 0..FRAME_WIDTH {
                dirty.set(x, y);
            }
        }

        let mut fresh = FrameBuffer::new();
        let r = renderer();
        r.render_closed(&mut dirty);
        r.render_closed(&mut fresh);
        assert_eq!(dirty.as_bytes(), fresh.as_bytes());
    }

    #[test]
    fn test_half_open_confined_to_eyelid_band() {
        let mut frame = FrameBuffer::new();
        renderer().render_half_open(&mut frame);

        for y in 0..FRAME_HEIGHT {
            if (24..=40).contains(&y) {
                continue;
            }
            for x in 0..FRAME_WIDTH {
                assert!(!frame.get(x, y), "lit pixel outside band at ({}, {})", x, y);
            }
        }

        // Band rows themselves carry sclera
        assert!(frame.get(16, 24));
        assert!(frame.get(16, 40));
        assert!(!frame.get(16, 23));
        assert!(!frame.get(16, 41));
    }

    #[test]
    fn test_half_open_pupil_and_iris_ring() {
        let mut frame = FrameBuffer::new();
        renderer().render_half_open(&mut frame);

        for ecx in [32, 96] {
            // Fixed dilation 0.3 puts the pupil radius at 4.2
            assert!(frame.get(ecx, 32));
            assert!(frame.get(ecx + 4, 32));
            // Between pupil and iris edge stays dark
            assert!(!frame.get(ecx + 5, 32));
            assert!(!frame.get(ecx + 9, 32));
            // Sclera resumes outside the iris
            assert!(frame.get(ecx + 10, 32));
            // Disk edge columns are included
            assert!(frame.get(ecx - 28, 32));
            assert!(frame.get(ecx + 28, 32));
        }
    }

    #[test]
    fn test_sclera_generated_lazily_and_once() {
        let mut r = renderer();
        let mut frame = FrameBuffer::new();

        r.render_closed(&mut frame);
        r.render_half_open(&mut frame);
        assert!(!r.sclera_cached());

        r.render_open(&centered(0.5), &mut frame);
        assert!(r.sclera_cached());

        let first = frame.clone();
        r.render_open(&centered(0.5), &mut frame);
        assert_eq!(first.as_bytes(), frame.as_bytes());
    }

    #[test]
    fn test_open_centered_is_symmetric_between_eyes() {
        let frame = open_frame(&centered(0.5));

        for y in 0..FRAME_HEIGHT {
            for x in 0..64 {
                assert_eq!(
                    frame.get(x, y),
                    frame.get(x + 64, y),
                    "asymmetry at ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_open_tilted_brows_mirror() {
        let params = FrameParams {
            eyebrow_angle: 8.0,
            ..centered(0.5)
        };
        let frame = open_frame(&params);

        for y in 0..FRAME_HEIGHT {
            for x in 0..FRAME_WIDTH {
                assert_eq!(
                    frame.get(x, y),
                    frame.get(128 - x, y),
                    "mirror mismatch at ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_eyebrow_angle_clamps_to_limit() {
        let at = |angle: f32| {
            open_frame(&FrameParams {
                eyebrow_angle: angle,
                ..centered(0.5)
            })
        };

        // Anything past the limit renders exactly like the limit
        assert_eq!(at(45.0).as_bytes(), at(10.0).as_bytes());
        assert_eq!(at(-45.0).as_bytes(), at(-10.0).as_bytes());
        assert_eq!(at(1000.0).as_bytes(), at(10.0).as_bytes());
        // And the limit is actually visible
        assert_ne!(at(10.0).as_bytes(), at(0.0).as_bytes());
    }

    #[test]
    fn test_pupil_radius_endpoints() {
        // pupil_size 0 -> radius 3
        let frame = open_frame(&centered(0.0));
        assert!(frame.get(35, 32));
        assert!(!frame.get(36, 32));

        // pupil_size 1 -> radius 7
        let frame = open_frame(&centered(1.0));
        assert!(frame.get(39, 32));
        assert!(!frame.get(40, 32));

        // pupil_size 0.5 -> radius 5, the linear midpoint
        let frame = open_frame(&centered(0.5));
        assert!(frame.get(37, 32));
        assert!(!frame.get(38, 32));
    }

    #[test]
    fn test_pupil_radius_extrapolates_out_of_range() {
        // 1.5 -> radius 9, filling the whole iris disk
        let frame = open_frame(&centered(1.5));
        assert!(frame.get(41, 32));

        // -0.25 -> radius 2, smaller than the nominal minimum
        let frame = open_frame(&centered(-0.25));
        assert!(frame.get(34, 32));
        assert!(!frame.get(35, 32));

        // -1.0 -> negative radius, no pupil at all; the carved iris
        // leaves the center dark
        let frame = open_frame(&centered(-1.0));
        assert!(!frame.get(32, 32));
    }

    #[test]
    fn test_gaze_shifts_iris_by_full_travel() {
        let base = open_frame(&centered(0.5));
        let right = open_frame(&FrameParams {
            pupil_x: 1.0,
            ..centered(0.5)
        });

        // Pupil center moves from x=32 to x=42 on the left eye
        assert!(base.get(32, 32));
        assert!(right.get(42, 32));
        // Old pupil position is inside the shifted cleared iris
        assert!(!base.get(40, 32));
        assert!(right.get(40, 32));
        // Ring of the shifted iris is dark where the base still shows sclera
        assert!(base.get(50, 32));
        assert!(!right.get(50, 32));
    }

    #[test]
    fn test_gaze_shifts_vertically() {
        let down = open_frame(&FrameParams {
            pupil_y: 1.0,
            ..centered(0.5)
        });

        // Pupil center lands at (32, 42)
        assert!(down.get(32, 42));
        // The vacated center column above is carved iris
        assert!(!down.get(32, 35));
    }

    #[test]
    fn test_eyebrows_lower_with_parameter() {
        let at = |low: f32| {
            open_frame(&FrameParams {
                eyebrows_low: low,
                ..centered(0.0)
            })
        };

        // Raised brows cut off above y=12
        let raised = at(0.0);
        assert!(!raised.get(16, 11));
        assert!(raised.get(16, 12));

        // Fully lowered brows cut off above y=24
        let lowered = at(1.0);
        assert!(!lowered.get(16, 23));
        assert!(lowered.get(16, 24));
    }

    #[test]
    fn test_expression_dispatch() {
        let mut r = renderer();
        let mut via_dispatch = FrameBuffer::new();
        let mut direct = FrameBuffer::new();

        r.render(&EyeExpression::Closed, &mut via_dispatch);
        r.render_closed(&mut direct);
        assert_eq!(via_dispatch.as_bytes(), direct.as_bytes());

        r.render(&EyeExpression::HalfOpen, &mut via_dispatch);
        r.render_half_open(&mut direct);
        assert_eq!(via_dispatch.as_bytes(), direct.as_bytes());

        let params = centered(0.7);
        r.render(&EyeExpression::Open(params), &mut via_dispatch);
        r.render_open(&params, &mut direct);
        assert_eq!(via_dispatch.as_bytes(), direct.as_bytes());
    }

    proptest! {
        #[test]
        fn prop_open_render_is_total_and_pure(
            pupil_y in -2.0f32..2.0,
            pupil_x in -2.0f32..2.0,
            eyebrows_low in -1.0f32..2.0,
            pupil_size in -2.0f32..3.0,
            eyebrow_angle in -90.0f32..90.0,
        ) {
            let params = FrameParams {
                pupil_y,
                pupil_x,
                eyebrows_low,
                pupil_size,
                eyebrow_angle,
            };

            let mut r = renderer();
            let mut first = FrameBuffer::new();
            let mut second = FrameBuffer::new();
            r.render_open(&params, &mut first);
            r.render_open(&params, &mut second);

            prop_assert_eq!(first.as_bytes(), second.as_bytes());
        }
    }
}
