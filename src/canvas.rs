// The painting itself: a frame-sized raster that keeps every stroke until
// cleared. Black means "nothing painted here"; it is added on top of the
// camera image each frame, so black pixels leave the video untouched.

use crate::draw::{add_saturating, draw_thick_line};
use crate::error::Error;
use crate::types::{Color, FrameBuffer, Point};

pub struct Canvas {
    buf: FrameBuffer,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { buf: FrameBuffer::new(width, height) }
    }

    /// Paint a round-capped segment from a to b.
    /// Painting in black erases.
    pub fn stroke(&mut self, a: Point, b: Point, color: Color, width: u32) {
        draw_thick_line(&mut self.buf, a, b, width, color);
    }

    /// Wipe every stroke.
    pub fn clear(&mut self) {
        self.buf.pixels.fill(Color::BLACK.0);
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.buf.pixels.iter().all(|&p| p == Color::BLACK.0)
    }

    /// Add the painting onto a camera frame (per-channel, saturating).
    pub fn overlay_onto(&self, frame: &mut FrameBuffer) -> Result<(), Error> {
        add_saturating(frame, &self.buf)
    }

    #[cfg(test)]
    pub fn pixel(&self, p: Point) -> Option<Color> {
        self.buf.get(p.x, p.y).map(Color)
    }

    /// Number of painted (non-black) pixels.
    #[cfg(test)]
    pub fn painted_pixels(&self) -> usize {
        self.buf.pixels.iter().filter(|&&p| p != Color::BLACK.0).count()
    }
}
