mod bbox;
mod editor;
mod point;
mod shapes;

pub use bbox::BoundingBox;
pub use editor::{
    CanvasMapper, LineHandle, RoiHandle, ZoneDraft, apply_roi_drag, drag_line_endpoint,
    hit_test_line, hit_test_roi, move_line, move_roi,
};
pub use point::Point;
pub use shapes::{Polygon, TriggerLine};
