//! Connected-component extraction over the binary motion mask.

use crate::geometry::{BoundingBox, Point};
use crate::motion::detector::MotionMask;

/// A connected region of motion-flagged cells above the minimum area.
#[derive(Debug, Clone)]
pub struct Blob {
    /// Region centroid in normalized coordinates.
    pub centroid: Point,
    /// Region extent in normalized coordinates.
    pub bbox: BoundingBox,
    /// Region size in working-resolution pixels.
    pub area: usize,
}

/// Flood-fill labeler with reusable scratch buffers.
///
/// The visited bitmap and work stack are sized to the mask and reused
/// across ticks rather than reallocated. Labeling is iterative over an
/// explicit stack, so the depth is bounded by the working-resolution pixel
/// count regardless of component shape.
#[derive(Debug)]
pub struct BlobExtractor {
    min_area: usize,
    visited: Vec<bool>,
    stack: Vec<(usize, usize)>,
}

impl BlobExtractor {
    /// Default minimum component area in working-resolution pixels.
    pub const DEFAULT_MIN_AREA: usize = 150;

    pub fn new(min_area: usize) -> Self {
        Self {
            min_area,
            visited: Vec::new(),
            stack: Vec::new(),
        }
    }

    pub fn min_area(&self) -> usize {
        self.min_area
    }

    /// Extract all connected components (4-connectivity) at or above the
    /// minimum area, in row-major discovery order.
    pub fn extract(&mut self, mask: &MotionMask) -> Vec<Blob> {
        let (w, h) = (mask.width(), mask.height());
        self.visited.clear();
        self.visited.resize(w * h, false);

        let mut blobs = Vec::new();
        for y in 0..h {
            for x in 0..w {
                if !mask.is_set(x, y) || self.visited[y * w + x] {
                    continue;
                }
                if let Some(blob) = self.grow_component(mask, x, y) {
                    blobs.push(blob);
                }
            }
        }
        blobs
    }

    fn grow_component(&mut self, mask: &MotionMask, seed_x: usize, seed_y: usize) -> Option<Blob> {
        let (w, h) = (mask.width(), mask.height());
        let (mut min_x, mut max_x) = (seed_x, seed_x);
        let (mut min_y, mut max_y) = (seed_y, seed_y);
        let (mut sum_x, mut sum_y) = (0usize, 0usize);
        let mut area = 0usize;

        self.stack.clear();
        self.stack.push((seed_x, seed_y));
        self.visited[seed_y * w + seed_x] = true;

        while let Some((x, y)) = self.stack.pop() {
            area += 1;
            sum_x += x;
            sum_y += y;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);

            let visit = |nx: usize, ny: usize, this: &mut Self| {
                let idx = ny * w + nx;
                if mask.is_set(nx, ny) && !this.visited[idx] {
                    this.visited[idx] = true;
                    this.stack.push((nx, ny));
                }
            };
            if x > 0 {
                visit(x - 1, y, self);
            }
            if x + 1 < w {
                visit(x + 1, y, self);
            }
            if y > 0 {
                visit(x, y - 1, self);
            }
            if y + 1 < h {
                visit(x, y + 1, self);
            }
        }

        if area < self.min_area {
            return None;
        }

        let (wf, hf) = (w as f32, h as f32);
        let centroid = Point::new(
            (sum_x as f32 / area as f32 + 0.5) / wf,
            (sum_y as f32 / area as f32 + 0.5) / hf,
        );
        let bbox = BoundingBox::new(
            min_x as f32 / wf,
            min_y as f32 / hf,
            (max_x + 1) as f32 / wf,
            (max_y + 1) as f32 / hf,
        );
        Some(Blob {
            centroid,
            bbox,
            area,
        })
    }
}

impl Default for BlobExtractor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_AREA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn mask_with_rects(w: usize, h: usize, rects: &[(usize, usize, usize, usize)]) -> MotionMask {
        let mut cells = Array2::<u8>::zeros((h, w));
        for &(x0, y0, rw, rh) in rects {
            for y in y0..y0 + rh {
                for x in x0..x0 + rw {
                    cells[[y, x]] = 1;
                }
            }
        }
        MotionMask::from_cells(cells)
    }

    #[test]
    fn test_two_components_row_major_order() {
        let mask = mask_with_rects(20, 10, &[(12, 2, 4, 4), (1, 5, 4, 4)]);
        let mut extractor = BlobExtractor::new(10);
        let blobs = extractor.extract(&mask);
        assert_eq!(blobs.len(), 2);
        // The component whose topmost row comes first is emitted first.
        assert!(blobs[0].centroid.x > blobs[1].centroid.x);
        assert_eq!(blobs[0].area, 16);
    }

    #[test]
    fn test_small_component_discarded() {
        let mask = mask_with_rects(20, 10, &[(2, 2, 2, 2), (10, 2, 5, 5)]);
        let mut extractor = BlobExtractor::new(10);
        let blobs = extractor.extract(&mask);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].area, 25);
    }

    #[test]
    fn test_centroid_and_bbox_normalized() {
        // 4x4 square centered in a 10x10 mask, spanning cells 3..7.
        let mask = mask_with_rects(10, 10, &[(3, 3, 4, 4)]);
        let mut extractor = BlobExtractor::new(1);
        let blobs = extractor.extract(&mask);
        assert_eq!(blobs.len(), 1);
        let b = &blobs[0];
        assert!((b.centroid.x - 0.5).abs() < 1e-6);
        assert!((b.centroid.y - 0.5).abs() < 1e-6);
        assert!((b.bbox.x1 - 0.3).abs() < 1e-6);
        assert!((b.bbox.x2 - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_cells_not_connected() {
        // Two cells touching only diagonally form two components.
        let mut cells = Array2::<u8>::zeros((5, 5));
        cells[[1, 1]] = 1;
        cells[[2, 2]] = 1;
        let mask = MotionMask::from_cells(cells);
        let mut extractor = BlobExtractor::new(1);
        assert_eq!(extractor.extract(&mask).len(), 2);
    }

    #[test]
    fn test_scratch_buffers_reused_across_calls() {
        let mask = mask_with_rects(20, 10, &[(1, 1, 5, 5)]);
        let mut extractor = BlobExtractor::new(10);
        let first = extractor.extract(&mask);
        let second = extractor.extract(&mask);
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].area, second[0].area);
    }
}
