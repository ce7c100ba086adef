// On-screen buttons: translucent rectangles with a centered label.
// Pointing at one with the index finger triggers its effect; the hovered
// button turns fully opaque for as long as the fingertip stays on it.

use crate::draw::{blend_rect, draw_text_5x7, text_width, GLYPH_HEIGHT};
use crate::types::{Color, FrameBuffer, Point};

/// Frame weight of an idle button.
pub const DEFAULT_ALPHA: f32 = 0.5;
/// Frame weight of a hovered button (fill only).
pub const HOVER_ALPHA: f32 = 0.0;
/// Frame weight of the white drawing board.
pub const BOARD_ALPHA: f32 = 0.6;

const LABEL_SCALE: i32 = 2;
const LABEL_COLOR: u32 = 0x00_FF_FF_FF;

/// Something a toggle button shows or hides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Colors,
    PenSizes,
    Board,
}

impl Panel {
    /// Label of the toggle while the panel is hidden.
    pub fn label(self) -> &'static str {
        match self {
            Panel::Colors => "COLORS",
            Panel::PenSizes => "PEN",
            Panel::Board => "BOARD",
        }
    }
}

/// What a button does when the fingertip lands on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonKind {
    ColorSwatch(Color),
    SizeSwatch(u32),
    Toggle(Panel),
    Clear,
    /// The drawing surface; only painted on, never pressed.
    Board,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub fill: Color,
    pub label: String,
    pub alpha: f32,
    pub kind: ButtonKind,
}

impl Button {
    pub fn new(x: i32, y: i32, w: i32, h: i32, fill: Color, label: &str, kind: ButtonKind) -> Self {
        Self { x, y, w, h, fill, label: label.to_string(), alpha: DEFAULT_ALPHA, kind }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// True iff p lies strictly inside the rectangle; the border is outside.
    pub fn is_over(&self, p: Point) -> bool {
        self.x < p.x && p.x < self.x + self.w && self.y < p.y && p.y < self.y + self.h
    }

    /// Hover feedback: opaque while the fingertip is on it, default otherwise.
    /// Returns whether it is hovered.
    pub fn track_hover(&mut self, p: Point) -> bool {
        let hit = self.is_over(p);
        self.alpha = if hit { HOVER_ALPHA } else { DEFAULT_ALPHA };
        hit
    }

    /// Blend the rectangle into the frame and center the label on it.
    pub fn draw(&self, frame: &mut FrameBuffer) {
        blend_rect(frame, self.x, self.y, self.w, self.h, self.fill, self.alpha);
        if self.label.is_empty() {
            return;
        }
        let tx = self.x + self.w / 2 - text_width(&self.label, LABEL_SCALE) / 2;
        let ty = self.y + self.h / 2 - GLYPH_HEIGHT * LABEL_SCALE / 2;
        draw_text_5x7(frame, tx, ty, &self.label, LABEL_SCALE, LABEL_COLOR);
    }
}
