// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the mirrored camera image with the painting on top.
// 2) Thick round-capped lines and filled discs (brush strokes, hand skeleton).
// 3) Translucent rectangles (buttons, the white board).
// 4) A tiny 5x7 bitmap font, scaled up, for button labels.

use crate::error::Error;
use crate::types::{pack_rgb, split_rgb, Color, FrameBuffer, Point};
use minifb::{Key, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // ~60 fps cap; the camera is the real limiter anyway
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Q quits; ESC too.
    pub fn quit_pressed(&self) -> bool {
        self.window.is_key_down(Key::Q) || self.window.is_key_down(Key::Escape)
    }
}

/* ---------- Software drawing ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Visit every pixel of the Bresenham line from a to b (both ends included).
fn for_each_line_pixel(a: Point, b: Point, mut visit: impl FnMut(i32, i32)) {
    let (mut x0, mut y0, x1, y1) = (a.x, a.y, b.x, b.y);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        visit(x0, y0);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Solid filled disc centered at c.
pub fn fill_disc(fb: &mut FrameBuffer, c: Point, radius: i32, color: Color) {
    if radius <= 0 {
        put_pixel(fb, c.x, c.y, color.0);
        return;
    }
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put_pixel(fb, c.x + dx, c.y + dy, color.0);
            }
        }
    }
}

/// Line of the given thickness with round caps.
/// Stamps a disc at every pixel along the centre line.
pub fn draw_thick_line(fb: &mut FrameBuffer, a: Point, b: Point, thickness: u32, color: Color) {
    let radius = (thickness / 2) as i32;
    if radius == 0 {
        for_each_line_pixel(a, b, |x, y| put_pixel(fb, x, y, color.0));
        return;
    }
    for_each_line_pixel(a, b, |x, y| fill_disc(fb, Point::new(x, y), radius, color));
}

/// Blend `fill` into the rectangle: out = bg*alpha + fill*(1-alpha) + 1.
/// alpha 0.0 paints the fill color (plus one), alpha 1.0 keeps the frame.
pub fn blend_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, fill: Color, alpha: f32) {
    let (fw, fh) = (fb.width as i32, fb.height as i32);
    let x0 = x.clamp(0, fw) as usize;
    let y0 = y.clamp(0, fh) as usize;
    let x1 = (x + w).clamp(0, fw) as usize;
    let y1 = (y + h).clamp(0, fh) as usize;
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    let inv = 1.0 - a;
    let (fr, fg, fbl) = fill.channels();

    let mix = |under: u8, over: u8| -> u8 {
        (under as f32 * a + over as f32 * inv + 1.0).round().clamp(0.0, 255.0) as u8
    };

    for row in y0..y1 {
        let ofs = row * fb.width;
        for px in &mut fb.pixels[ofs + x0..ofs + x1] {
            let (r, g, b) = split_rgb(*px);
            *px = pack_rgb(mix(r, fr), mix(g, fg), mix(b, fbl));
        }
    }
}

/// Saturating per-channel add of `overlay` onto `fb` (same size).
/// Black overlay pixels leave the frame untouched.
pub fn add_saturating(fb: &mut FrameBuffer, overlay: &FrameBuffer) -> Result<(), Error> {
    if fb.width != overlay.width || fb.height != overlay.height {
        return Err(Error::Render(format!(
            "overlay is {}x{}, frame is {}x{}",
            overlay.width, overlay.height, fb.width, fb.height
        )));
    }
    for (dst, &src) in fb.pixels.iter_mut().zip(&overlay.pixels) {
        if src == 0 { continue; }
        let (r0, g0, b0) = split_rgb(*dst);
        let (r1, g1, b1) = split_rgb(src);
        *dst = pack_rgb(r0.saturating_add(r1), g0.saturating_add(g1), b0.saturating_add(b1));
    }
    Ok(())
}

/* ---------- 5x7 bitmap font (digits + the capitals the buttons use) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Fill a scale x scale block (one "font pixel").
fn put_block(fb: &mut FrameBuffer, x: i32, y: i32, scale: i32, color: u32) {
    for dy in 0..scale {
        for dx in 0..scale {
            put_pixel(fb, x + dx, y + dy, color);
        }
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel `scale` wide.
/// A black shadow one font pixel down-right keeps it readable on any fill.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, scale: i32, color: u32) {
    let Some(rows) = glyph5x7(ch) else { return };

    // shadow pass first, then the glyph itself
    for (ofs, c) in [(scale, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_block(fb, x + rx * scale + ofs, y + ry as i32 * scale + ofs, scale, c);
                }
            }
        }
    }
}

/// Width in pixels of `text` at `scale` (6 font pixels per glyph, minus trailing gap).
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * 6 - 1) * scale }
}

pub const GLYPH_HEIGHT: i32 = 7;

/// Draw a text string using scaled 5x7 glyphs; (x,y) is the top-left corner.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, scale: i32, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, scale, color);
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}
