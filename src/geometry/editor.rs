//! Interactive shape editing: pointer mapping, hit-testing and clamped
//! drag operations for the ROI rectangle, trigger line and trigger zones.
//!
//! Pointer input arrives in the rendering surface's pixel space; every edit
//! is converted to normalized coordinates before it touches the shape
//! configuration. Edits that would violate a shape invariant (minimum size,
//! unit-square bounds) are rejected as no-ops rather than raised as errors,
//! since they originate from continuous pointer movement.

use nalgebra::Vector2;

use crate::geometry::bbox::BoundingBox;
use crate::geometry::point::Point;
use crate::geometry::shapes::{Polygon, TriggerLine};

/// Pixel radius around an ROI handle that still hits it.
const ROI_HANDLE_TOLERANCE_PX: f32 = 16.0;
/// Pixel radius around a trigger-line endpoint.
const LINE_ENDPOINT_TOLERANCE_PX: f32 = 14.0;
/// Pixel half-width of the band around the line segment body.
const LINE_BAND_TOLERANCE_PX: f32 = 10.0;
/// Minimum ROI edge length in normalized units.
const MIN_ROI_SIZE: f32 = 0.05;

/// Maps between the rendering surface's pixel space and normalized frame
/// coordinates.
#[derive(Debug, Clone, Copy)]
pub struct CanvasMapper {
    pub width: f32,
    pub height: f32,
}

impl CanvasMapper {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pointer position in pixels to normalized coordinates, clamped to the
    /// unit square.
    pub fn to_norm(&self, px: f32, py: f32) -> Point {
        Point::new(px / self.width, py / self.height).clamp_unit()
    }

    /// Normalized point to surface pixels.
    pub fn to_canvas(&self, p: &Point) -> (f32, f32) {
        (p.x * self.width, p.y * self.height)
    }

    fn pixel_distance(&self, p: &Point, px: f32, py: f32) -> f32 {
        let (cx, cy) = self.to_canvas(p);
        ((cx - px).powi(2) + (cy - py).powi(2)).sqrt()
    }
}

/// Which part of the ROI rectangle a pointer interaction manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoiHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    /// Inside the rectangle, not on a handle: move the whole rectangle.
    Body,
}

/// Which part of the trigger line a pointer interaction manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineHandle {
    Start,
    End,
    /// On the segment band: move the whole line.
    Body,
}

/// Hit-test a pointer position against the ROI rectangle's handles.
///
/// Corner handles win over edge handles, and any handle wins over the body.
pub fn hit_test_roi(
    mapper: &CanvasMapper,
    roi: &BoundingBox,
    px: f32,
    py: f32,
) -> Option<RoiHandle> {
    let cx = (roi.x1 + roi.x2) / 2.0;
    let cy = (roi.y1 + roi.y2) / 2.0;
    let handles = [
        (RoiHandle::TopLeft, Point::new(roi.x1, roi.y1)),
        (RoiHandle::TopRight, Point::new(roi.x2, roi.y1)),
        (RoiHandle::BottomLeft, Point::new(roi.x1, roi.y2)),
        (RoiHandle::BottomRight, Point::new(roi.x2, roi.y2)),
        (RoiHandle::Top, Point::new(cx, roi.y1)),
        (RoiHandle::Bottom, Point::new(cx, roi.y2)),
        (RoiHandle::Left, Point::new(roi.x1, cy)),
        (RoiHandle::Right, Point::new(roi.x2, cy)),
    ];

    for (handle, anchor) in handles {
        if mapper.pixel_distance(&anchor, px, py) <= ROI_HANDLE_TOLERANCE_PX {
            return Some(handle);
        }
    }

    if roi.contains(&mapper.to_norm(px, py)) {
        return Some(RoiHandle::Body);
    }
    None
}

/// Hit-test a pointer position against the trigger line.
pub fn hit_test_line(
    mapper: &CanvasMapper,
    line: &TriggerLine,
    px: f32,
    py: f32,
) -> Option<LineHandle> {
    if mapper.pixel_distance(&line.p1, px, py) <= LINE_ENDPOINT_TOLERANCE_PX {
        return Some(LineHandle::Start);
    }
    if mapper.pixel_distance(&line.p2, px, py) <= LINE_ENDPOINT_TOLERANCE_PX {
        return Some(LineHandle::End);
    }

    // Band test runs in pixel space so the tolerance is isotropic on screen.
    let px_line = TriggerLine::new(
        Point::new(line.p1.x * mapper.width, line.p1.y * mapper.height),
        Point::new(line.p2.x * mapper.width, line.p2.y * mapper.height),
    );
    if px_line.distance_to(&Point::new(px, py)) <= LINE_BAND_TOLERANCE_PX {
        return Some(LineHandle::Body);
    }
    None
}

/// Apply a handle drag to the ROI rectangle.
///
/// The dragged edge(s) follow `target`; the result is clamped to the unit
/// square. If the edit would shrink either dimension below the minimum
/// size, the original rectangle is returned unchanged. `Body` drags are
/// handled by [`move_roi`], not here.
pub fn apply_roi_drag(roi: &BoundingBox, handle: RoiHandle, target: Point) -> BoundingBox {
    let t = target.clamp_unit();
    let mut r = *roi;
    match handle {
        RoiHandle::TopLeft => {
            r.x1 = t.x;
            r.y1 = t.y;
        }
        RoiHandle::TopRight => {
            r.x2 = t.x;
            r.y1 = t.y;
        }
        RoiHandle::BottomLeft => {
            r.x1 = t.x;
            r.y2 = t.y;
        }
        RoiHandle::BottomRight => {
            r.x2 = t.x;
            r.y2 = t.y;
        }
        RoiHandle::Top => r.y1 = t.y,
        RoiHandle::Bottom => r.y2 = t.y,
        RoiHandle::Left => r.x1 = t.x,
        RoiHandle::Right => r.x2 = t.x,
        RoiHandle::Body => return *roi,
    }

    if r.x2 - r.x1 < MIN_ROI_SIZE || r.y2 - r.y1 < MIN_ROI_SIZE {
        return *roi;
    }
    r
}

/// Translate the whole ROI rectangle, preserving its size.
///
/// The translation is clamped so the rectangle never leaves the unit
/// square.
pub fn move_roi(roi: &BoundingBox, delta: Vector2<f32>) -> BoundingBox {
    let dx = delta.x.clamp(-roi.x1, 1.0 - roi.x2);
    let dy = delta.y.clamp(-roi.y1, 1.0 - roi.y2);
    BoundingBox {
        x1: roi.x1 + dx,
        y1: roi.y1 + dy,
        x2: roi.x2 + dx,
        y2: roi.y2 + dy,
    }
}

/// Move one endpoint of the trigger line, clamped to the unit square.
pub fn drag_line_endpoint(line: &TriggerLine, handle: LineHandle, target: Point) -> TriggerLine {
    let t = target.clamp_unit();
    match handle {
        LineHandle::Start => TriggerLine::new(t, line.p2),
        LineHandle::End => TriggerLine::new(line.p1, t),
        LineHandle::Body => *line,
    }
}

/// Translate the whole trigger line; the translation is clamped so both
/// endpoints stay inside the unit square.
pub fn move_line(line: &TriggerLine, delta: Vector2<f32>) -> TriggerLine {
    let min_x = line.p1.x.min(line.p2.x);
    let max_x = line.p1.x.max(line.p2.x);
    let min_y = line.p1.y.min(line.p2.y);
    let max_y = line.p1.y.max(line.p2.y);

    let dx = delta.x.clamp(-min_x, 1.0 - max_x);
    let dy = delta.y.clamp(-min_y, 1.0 - max_y);
    TriggerLine::new(
        Point::new(line.p1.x + dx, line.p1.y + dy),
        Point::new(line.p2.x + dx, line.p2.y + dy),
    )
}

/// In-progress polygon drawn by the operator, one appended vertex per
/// click. Closing requires at least 3 vertices.
#[derive(Debug, Clone, Default)]
pub struct ZoneDraft {
    points: Vec<Point>,
}

impl ZoneDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex at the clicked position.
    pub fn push(&mut self, p: Point) {
        self.points.push(p.clamp_unit());
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Finalize the draft into a polygon. Fewer than 3 vertices yields
    /// `None` and the draft is left untouched for further clicks.
    pub fn close(&mut self) -> Option<Polygon> {
        if self.points.len() < 3 {
            return None;
        }
        Polygon::new(std::mem::take(&mut self.points))
    }

    /// Discard all vertices.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
