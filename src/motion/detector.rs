//! Frame-differencing motion detector.
//!
//! Works at a fixed small resolution regardless of the source frame size so
//! the per-tick cost is bounded. The detector keeps the previous frame's
//! luminance buffer between calls; the first call only seeds that buffer so
//! startup does not read as full-frame motion.

use ndarray::Array2;

use crate::geometry::Polygon;
use crate::pipeline::FrameView;

/// Motion detector configuration.
#[derive(Debug, Clone)]
pub struct MotionConfig {
    /// Working resolution width in pixels.
    pub width: usize,
    /// Working resolution height in pixels.
    pub height: usize,
    /// Minimum per-pixel luminance delta (0-255) counted as motion.
    pub diff_threshold: u8,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 45,
            diff_threshold: 20,
        }
    }
}

/// Binary motion mask at the detector's working resolution.
///
/// Stored as `Array2<u8>` in `[row, col]` order; a cell is 1 where motion
/// was detected.
#[derive(Debug, Clone)]
pub struct MotionMask {
    cells: Array2<u8>,
}

impl MotionMask {
    pub(crate) fn new(cells: Array2<u8>) -> Self {
        Self { cells }
    }

    /// Build a mask directly from cell values (row-major, 0 or 1).
    pub fn from_cells(cells: Array2<u8>) -> Self {
        Self { cells }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Whether the cell at (x, y) is motion-flagged.
    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.cells[[y, x]] != 0
    }

    /// Total number of motion-flagged cells.
    pub fn motion_pixels(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Fraction of the polygon's interior covered by motion.
    ///
    /// The polygon is rasterized by testing each cell center in normalized
    /// coordinates. Returns 0.0 when the polygon covers no cells.
    pub fn fill_ratio(&self, zone: &Polygon) -> f32 {
        let (w, h) = (self.width(), self.height());
        let mut inside = 0usize;
        let mut moving = 0usize;
        for y in 0..h {
            for x in 0..w {
                let center = crate::geometry::Point::new(
                    (x as f32 + 0.5) / w as f32,
                    (y as f32 + 0.5) / h as f32,
                );
                if zone.contains(&center) {
                    inside += 1;
                    if self.is_set(x, y) {
                        moving += 1;
                    }
                }
            }
        }
        if inside == 0 {
            return 0.0;
        }
        moving as f32 / inside as f32
    }
}

/// Grayscale frame-differencing detector with noise suppression.
#[derive(Debug)]
pub struct MotionDetector {
    config: MotionConfig,
    prev_luma: Option<Array2<u8>>,
}

impl MotionDetector {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            prev_luma: None,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Process one frame and produce the binary motion mask.
    ///
    /// Returns `None` on the first frame after construction or
    /// [`MotionDetector::reset`]: the luminance buffer is seeded and no
    /// motion is reported.
    pub fn process(&mut self, frame: &FrameView<'_>) -> Option<MotionMask> {
        let luma = self.downsample_luma(frame);

        let Some(prev) = self.prev_luma.take() else {
            self.prev_luma = Some(luma);
            return None;
        };

        let threshold = self.config.diff_threshold;
        let mut raw = Array2::<u8>::zeros(luma.raw_dim());
        ndarray::Zip::from(&mut raw)
            .and(&luma)
            .and(&prev)
            .for_each(|out, &cur, &old| {
                *out = u8::from(cur.abs_diff(old) >= threshold);
            });

        self.prev_luma = Some(luma);
        Some(MotionMask::new(Self::open(&raw)))
    }

    /// Drop the previous-frame buffer (camera switch).
    pub fn reset(&mut self) {
        self.prev_luma = None;
    }

    fn downsample_luma(&self, frame: &FrameView<'_>) -> Array2<u8> {
        let (ww, wh) = (self.config.width, self.config.height);
        let (sw, sh) = (frame.width as usize, frame.height as usize);
        Array2::from_shape_fn((wh, ww), |(y, x)| {
            let sx = (x * sw / ww).min(sw - 1);
            let sy = (y * sh / wh).min(sh - 1);
            let idx = (sy * sw + sx) * 3;
            let r = frame.data[idx] as u32;
            let g = frame.data[idx + 1] as u32;
            let b = frame.data[idx + 2] as u32;
            // Integer approximation of 0.30R + 0.59G + 0.11B
            ((77 * r + 150 * g + 29 * b) >> 8) as u8
        })
    }

    /// One pass of binary opening: a cell survives only if it and all four
    /// orthogonal neighbors are set. Removes isolated noise pixels.
    fn open(raw: &Array2<u8>) -> Array2<u8> {
        let (h, w) = raw.dim();
        Array2::from_shape_fn((h, w), |(y, x)| {
            if y == 0 || x == 0 || y + 1 >= h || x + 1 >= w {
                return 0;
            }
            let survives = raw[[y, x]] != 0
                && raw[[y - 1, x]] != 0
                && raw[[y + 1, x]] != 0
                && raw[[y, x - 1]] != 0
                && raw[[y, x + 1]] != 0;
            u8::from(survives)
        })
    }
}

impl Default for MotionDetector {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}
