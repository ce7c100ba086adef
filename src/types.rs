// Core types shared by the camera, tracker, canvas and UI.

/// One frame of pixels, laid out row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Pixel at (x,y), or None when outside the frame.
    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}

/// Integer pixel position (frame coordinates, y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Packed 0x00RRGGBB color, same layout as a FrameBuffer pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Split back into (r, g, b).
    #[inline]
    pub fn channels(self) -> (u8, u8, u8) {
        split_rgb(self.0)
    }
}

#[inline]
pub fn split_rgb(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_packs_like_a_pixel() {
        let c = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(c.0, 0x0012_3456);
        assert_eq!(c.channels(), (0x12, 0x34, 0x56));
    }

    #[test]
    fn get_is_none_outside_frame() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.get(3, 2), Some(0));
        assert_eq!(fb.get(4, 0), None);
        assert_eq!(fb.get(0, -1), None);
    }
}
