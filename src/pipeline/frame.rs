/// A borrowed view of one decoded video frame, tightly packed RGB8.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> FrameView<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        debug_assert!(data.len() >= (width * height * 3) as usize);
        Self {
            data,
            width,
            height,
        }
    }
}

/// Provider of the active camera's current frame.
///
/// Returning `None` means the source is not ready (stream still opening,
/// no decoded frame yet); the engine skips the tick entirely in that case,
/// with no detector state change. If decoding happens on another thread,
/// the implementation must hand frames over complete (double-buffer swap or
/// equivalent) so a tick never observes a partially written frame.
pub trait FrameSource {
    fn frame(&self) -> Option<FrameView<'_>>;
}
