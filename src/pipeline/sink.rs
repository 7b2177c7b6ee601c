use crate::trigger::CaptureEvent;

/// Consumer of capture events, responsible for display and persistence.
pub trait CaptureSink {
    fn on_capture(&mut self, event: CaptureEvent);
}

impl CaptureSink for Vec<CaptureEvent> {
    fn on_capture(&mut self, event: CaptureEvent) {
        self.push(event);
    }
}
