// Paint application state and the per-frame gesture interpretation.
//
// Each frame is exactly one of three modes, picked from the finger-up vector
// of the first hand and where its index fingertip is:
// - navigation: only the index finger up, fingertip off the board;
//   the fingertip presses buttons;
// - drawing: index up, middle down, fingertip on the shown board;
//   the fingertip paints;
// - idle: everything else. A frame with no hand at all is idle too but
//   keeps the stroke, so a one-frame tracking dropout doesn't break a line.

use rand::Rng;

use crate::canvas::Canvas;
use crate::error::Error;
use crate::hand::{landmarks, Fingers, HandTracker};
use crate::types::{Color, FrameBuffer, Point};
use crate::ui::{Button, ButtonKind, Panel, BOARD_ALPHA, DEFAULT_ALPHA, HOVER_ALPHA};

/// Frames a toggle stays locked after firing.
pub const TOGGLE_COOLDOWN: u32 = 10;
/// Toggles are locked for this many frames after startup.
pub const STARTUP_COOLDOWN: u32 = 20;

pub const INITIAL_BRUSH_SIZE: u32 = 5;
pub const ERASER_SIZE: u32 = 20;
pub const INITIAL_COLOR: Color = Color::rgb(0, 0, 255);
/// Selecting this color turns the brush into the eraser.
pub const ERASER_COLOR: Color = Color::BLACK;
pub const PEN_SIZES: [u32; 4] = [5, 10, 15, 20];

const HIDE_LABEL: &str = "HIDE";

/// What the first hand is doing this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandInput {
    /// Index fingertip.
    pub tip: Point,
    pub fingers: Fingers,
}

impl HandInput {
    /// Read the first hand from the tracker's last detection.
    pub fn from_tracker(tracker: &dyn HandTracker) -> Option<Self> {
        let fingers = tracker.fingers_up()?;
        let tip = *tracker.landmarks(0).get(landmarks::INDEX_FINGER_TIP)?;
        Some(Self { tip, fingers })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Navigation,
    Drawing,
    Idle,
}

pub struct PaintApp {
    canvas: Canvas,
    // always visible; colors, pen sizes, board
    toggles: [Button; 3],
    colors: Vec<Button>,
    clear: Button,
    pens: Vec<Button>,
    board: Button,

    show_colors: bool,
    show_pens: bool,
    show_board: bool,
    cooldown: u32,

    color: Color,
    brush_size: u32,
    eraser_size: u32,
    prev: Option<Point>,
}

impl PaintApp {
    /// Fresh app for a `width` x `height` frame; the first color swatch is random.
    pub fn new(width: usize, height: usize) -> Self {
        let mut rng = rand::rng();
        let surprise = Color::rgb(rng.random(), rng.random(), rng.random());
        Self::with_first_swatch(width, height, surprise)
    }

    pub fn with_first_swatch(width: usize, height: usize, first_swatch: Color) -> Self {
        let toggles = [
            Button::new(200, 0, 100, 100, Color::rgb(0, 255, 120), Panel::Colors.label(), ButtonKind::Toggle(Panel::Colors)),
            Button::new(1100, 0, 100, 50, INITIAL_COLOR, Panel::PenSizes.label(), ButtonKind::Toggle(Panel::PenSizes)),
            Button::new(50, 0, 100, 100, Color::rgb(0, 255, 255), Panel::Board.label(), ButtonKind::Toggle(Panel::Board)),
        ];

        let swatches = [
            (first_swatch, ""),
            (Color::rgb(255, 0, 0), ""),
            (Color::rgb(0, 0, 255), ""),
            (Color::rgb(0, 255, 0), ""),
            (Color::rgb(255, 255, 0), ""),
            (ERASER_COLOR, "ERASER"),
        ];
        let colors = swatches
            .iter()
            .zip((300..).step_by(100))
            .map(|(&(c, label), x)| Button::new(x, 0, 100, 100, c, label, ButtonKind::ColorSwatch(c)))
            .collect();

        let pens = PEN_SIZES
            .iter()
            .zip((50..).step_by(100))
            .map(|(&size, y)| {
                Button::new(1100, y, 100, 100, Color::rgb(50, 50, 50), &size.to_string(), ButtonKind::SizeSwatch(size))
            })
            .collect();

        Self {
            canvas: Canvas::new(width, height),
            toggles,
            colors,
            clear: Button::new(900, 0, 100, 100, Color::rgb(100, 100, 100), "CLEAR", ButtonKind::Clear),
            pens,
            board: Button::new(50, 120, 1020, 580, Color::WHITE, "", ButtonKind::Board).with_alpha(BOARD_ALPHA),
            show_colors: false,
            show_pens: false,
            show_board: false,
            cooldown: STARTUP_COOLDOWN,
            color: INITIAL_COLOR,
            brush_size: INITIAL_BRUSH_SIZE,
            eraser_size: ERASER_SIZE,
            prev: None,
        }
    }

    /// Which mode this input puts the frame in.
    pub fn mode_for(&self, input: Option<HandInput>) -> Mode {
        let Some(HandInput { tip, fingers }) = input else {
            return Mode::Idle;
        };
        let over_board = self.board.is_over(tip);
        let pointing = fingers.index && !fingers.thumb && !fingers.middle && !fingers.ring && !fingers.pinky;

        if pointing && !over_board {
            Mode::Navigation
        } else if fingers.index && !fingers.middle && self.show_board && over_board {
            Mode::Drawing
        } else {
            Mode::Idle
        }
    }

    /// Advance one frame with this frame's hand input.
    pub fn step(&mut self, input: Option<HandInput>) -> Mode {
        self.cooldown = self.cooldown.saturating_sub(1);

        let Some(hand) = input else {
            return Mode::Idle;
        };
        let mode = self.mode_for(Some(hand));
        match mode {
            Mode::Navigation => self.navigate(hand.tip),
            Mode::Drawing => self.paint(hand.tip),
            Mode::Idle => self.prev = None,
        }
        mode
    }

    fn navigate(&mut self, tip: Point) {
        self.prev = None;

        let mut pressed = Vec::new();
        if self.show_pens {
            pressed.extend(hovered(&mut self.pens, tip));
        }
        if self.show_colors {
            pressed.extend(hovered(&mut self.colors, tip));
            if self.clear.track_hover(tip) {
                pressed.push(self.clear.kind);
            }
        }
        for kind in pressed {
            self.press(kind);
        }

        for i in 0..self.toggles.len() {
            if self.toggles[i].is_over(tip) && self.cooldown == 0 {
                self.cooldown = TOGGLE_COOLDOWN;
                self.toggles[i].alpha = HOVER_ALPHA;
                self.press(self.toggles[i].kind);
            } else {
                self.toggles[i].alpha = DEFAULT_ALPHA;
            }
        }
    }

    fn press(&mut self, kind: ButtonKind) {
        match kind {
            ButtonKind::ColorSwatch(color) => {
                self.color = color;
                tracing::debug!(color = %format!("#{:06x}", color.0), "selected color");
            }
            ButtonKind::SizeSwatch(size) => {
                self.brush_size = size;
                tracing::debug!(size, "selected brush size");
            }
            ButtonKind::Clear => {
                self.canvas.clear();
                tracing::info!("canvas cleared");
            }
            ButtonKind::Toggle(panel) => {
                let shown = match panel {
                    Panel::Colors => &mut self.show_colors,
                    Panel::PenSizes => &mut self.show_pens,
                    Panel::Board => &mut self.show_board,
                };
                *shown = !*shown;
                let shown = *shown;
                if let Some(toggle) = self.toggles.iter_mut().find(|b| b.kind == kind) {
                    toggle.label = if shown { HIDE_LABEL } else { panel.label() }.to_string();
                }
                tracing::info!(?panel, shown, "toggled panel");
            }
            ButtonKind::Board => {}
        }
    }

    fn paint(&mut self, tip: Point) {
        // first frame of a stroke: start where the finger is, not at a stale point
        let from = self.prev.unwrap_or(tip);
        let (color, width) = if self.color == ERASER_COLOR {
            (ERASER_COLOR, self.eraser_size)
        } else {
            (self.color, self.brush_size)
        };
        self.canvas.stroke(from, tip, color, width);
        self.prev = Some(tip);
    }

    /// Composite the painting and the UI over the camera frame.
    pub fn render(&self, frame: &mut FrameBuffer) -> Result<(), Error> {
        self.canvas.overlay_onto(frame)?;

        let [colors_toggle, pens_toggle, board_toggle] = &self.toggles;
        colors_toggle.draw(frame);
        pens_toggle.draw(frame);
        if self.show_colors {
            for b in &self.colors {
                b.draw(frame);
            }
            self.clear.draw(frame);
        }
        if self.show_pens {
            for b in &self.pens {
                b.draw(frame);
            }
        }
        if self.show_board {
            self.board.draw(frame);
        }
        board_toggle.draw(frame);
        Ok(())
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    #[cfg(test)]
    pub fn is_shown(&self, panel: Panel) -> bool {
        match panel {
            Panel::Colors => self.show_colors,
            Panel::PenSizes => self.show_pens,
            Panel::Board => self.show_board,
        }
    }

    #[cfg(test)]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[cfg(test)]
    pub fn previous_point(&self) -> Option<Point> {
        self.prev
    }
}

/// Update hover feedback on `buttons` and return the kinds under `tip`.
fn hovered(buttons: &mut [Button], tip: Point) -> Vec<ButtonKind> {
    buttons
        .iter_mut()
        .filter_map(|b| b.track_hover(tip).then_some(b.kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{hand_pose, FixtureTracker};

    const POINT: Fingers = Fingers { thumb: false, index: true, middle: false, ring: false, pinky: false };
    const PEACE: Fingers = Fingers { thumb: false, index: true, middle: true, ring: false, pinky: false };
    // index + thumb out: not the navigation pose, still a drawing pose
    const GUN: Fingers = Fingers { thumb: true, index: true, middle: false, ring: false, pinky: false };

    const COLORS_TOGGLE: Point = Point::new(250, 50);
    const PENS_TOGGLE: Point = Point::new(1150, 25);
    const BOARD_TOGGLE: Point = Point::new(100, 50);
    const RED_SWATCH: Point = Point::new(450, 50);
    const ERASER_SWATCH: Point = Point::new(850, 50);
    const CLEAR_BUTTON: Point = Point::new(950, 50);
    const PEN_15: Point = Point::new(1150, 300);
    const ON_BOARD: Point = Point::new(500, 400);
    const NOWHERE: Point = Point::new(1240, 700);

    fn at(tip: Point, fingers: Fingers) -> Option<HandInput> {
        Some(HandInput { tip, fingers })
    }

    fn app() -> PaintApp {
        let mut app = PaintApp::with_first_swatch(1280, 720, Color::rgb(1, 2, 3));
        // let the startup lock run out
        for _ in 0..STARTUP_COOLDOWN {
            app.step(None);
        }
        app
    }

    /// Press a toggle once and move away until its cooldown has passed.
    fn toggle(app: &mut PaintApp, at_toggle: Point) {
        app.step(at(at_toggle, POINT));
        for _ in 0..TOGGLE_COOLDOWN {
            app.step(at(NOWHERE, POINT));
        }
    }

    #[test]
    fn modes_are_exclusive_and_follow_the_fingers() {
        let mut a = app();
        assert_eq!(a.mode_for(None), Mode::Idle);
        assert_eq!(a.mode_for(at(NOWHERE, POINT)), Mode::Navigation);
        assert_eq!(a.mode_for(at(NOWHERE, PEACE)), Mode::Idle);
        assert_eq!(a.mode_for(at(NOWHERE, GUN)), Mode::Idle);
        // board hidden: no canvas area to draw in
        assert_eq!(a.mode_for(at(ON_BOARD, POINT)), Mode::Idle);

        toggle(&mut a, BOARD_TOGGLE);
        assert!(a.is_shown(Panel::Board));
        assert_eq!(a.mode_for(at(ON_BOARD, POINT)), Mode::Drawing);
        assert_eq!(a.mode_for(at(ON_BOARD, GUN)), Mode::Drawing);
        assert_eq!(a.mode_for(at(ON_BOARD, PEACE)), Mode::Idle);
        assert_eq!(a.mode_for(at(ON_BOARD, Fingers::default())), Mode::Idle);
    }

    #[test]
    fn color_swatch_changes_color_only() {
        let mut a = app();
        toggle(&mut a, COLORS_TOGGLE);
        assert!(a.is_shown(Panel::Colors));

        a.step(at(RED_SWATCH, POINT));
        assert_eq!(a.color(), Color::rgb(255, 0, 0));
        assert_eq!(a.brush_size(), INITIAL_BRUSH_SIZE);
        assert_eq!(a.colors[1].alpha, HOVER_ALPHA);
        assert_eq!(a.colors[0].alpha, DEFAULT_ALPHA);

        a.step(at(NOWHERE, POINT));
        assert_eq!(a.colors[1].alpha, DEFAULT_ALPHA);
        assert_eq!(a.color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn size_swatch_changes_size_only() {
        let mut a = app();
        toggle(&mut a, PENS_TOGGLE);
        assert!(a.is_shown(Panel::PenSizes));

        a.step(at(PEN_15, POINT));
        assert_eq!(a.brush_size(), 15);
        assert_eq!(a.color(), INITIAL_COLOR);
    }

    #[test]
    fn hidden_panels_ignore_the_fingertip() {
        let mut a = app();
        a.step(at(RED_SWATCH, POINT));
        a.step(at(PEN_15, POINT));
        assert_eq!(a.color(), INITIAL_COLOR);
        assert_eq!(a.brush_size(), INITIAL_BRUSH_SIZE);
    }

    #[test]
    fn clear_blanks_the_canvas() {
        let mut a = app();
        toggle(&mut a, BOARD_TOGGLE);
        a.step(at(ON_BOARD, POINT));
        a.step(at(Point::new(700, 500), POINT));
        a.step(at(Point::new(300, 600), POINT));
        assert!(!a.canvas().is_blank());

        toggle(&mut a, COLORS_TOGGLE);
        a.step(at(CLEAR_BUTTON, POINT));
        assert!(a.canvas().is_blank());
        assert_eq!(a.clear.alpha, HOVER_ALPHA);
    }

    #[test]
    fn entering_drawing_mode_starts_at_the_fingertip() {
        let mut a = app();
        toggle(&mut a, BOARD_TOGGLE);

        a.step(at(Point::new(200, 200), POINT));
        a.step(at(Point::new(220, 200), POINT));
        assert_eq!(a.previous_point(), Some(Point::new(220, 200)));

        // lift the finger, then come back somewhere else
        assert_eq!(a.step(at(Point::new(220, 200), PEACE)), Mode::Idle);
        assert_eq!(a.previous_point(), None);
        let before = a.canvas().painted_pixels();
        a.step(at(Point::new(800, 600), POINT));

        // only a dot at the entry point, nothing between the two strokes
        assert!(a.canvas().pixel(Point::new(800, 600)).is_some_and(|c| c != Color::BLACK));
        assert_eq!(a.canvas().pixel(Point::new(500, 400)), Some(Color::BLACK));
        let dot = a.canvas().painted_pixels() - before;
        assert!(dot <= 25, "entry dot painted {dot} pixels");
    }

    #[test]
    fn lost_hand_frame_keeps_the_stroke() {
        let mut a = app();
        toggle(&mut a, BOARD_TOGGLE);
        a.step(at(Point::new(300, 400), POINT));
        assert_eq!(a.step(None), Mode::Idle);
        assert_eq!(a.previous_point(), Some(Point::new(300, 400)));

        // the tracker finds the hand again: the line joins up across the gap
        a.step(at(Point::new(400, 400), POINT));
        assert_eq!(a.canvas().pixel(Point::new(350, 400)), Some(INITIAL_COLOR));
    }

    #[test]
    fn navigation_drops_the_stroke() {
        let mut a = app();
        toggle(&mut a, BOARD_TOGGLE);
        a.step(at(Point::new(200, 200), POINT));
        assert_eq!(a.step(at(NOWHERE, POINT)), Mode::Navigation);
        assert_eq!(a.previous_point(), None);
    }

    #[test]
    fn eraser_uses_eraser_width() {
        let mut a = app();
        toggle(&mut a, BOARD_TOGGLE);
        // a wide blue bar
        toggle(&mut a, PENS_TOGGLE);
        a.step(at(Point::new(1150, 400), POINT)); // size 20
        a.step(at(Point::new(300, 400), POINT));
        a.step(at(Point::new(600, 400), POINT));
        assert_eq!(a.canvas().pixel(Point::new(450, 392)), Some(INITIAL_COLOR));

        // back to size 5 so the eraser width can't come from the brush
        a.step(at(Point::new(1150, 100), POINT));
        assert_eq!(a.brush_size(), 5);

        toggle(&mut a, COLORS_TOGGLE);
        a.step(at(ERASER_SWATCH, POINT));
        assert_eq!(a.color(), ERASER_COLOR);
        a.step(at(Point::new(300, 400), POINT));
        a.step(at(Point::new(600, 400), POINT));
        assert_eq!(a.canvas().pixel(Point::new(450, 392)), Some(Color::BLACK));
        assert_eq!(a.canvas().pixel(Point::new(450, 408)), Some(Color::BLACK));
    }

    #[test]
    fn toggle_is_debounced() {
        let mut a = app();
        a.step(at(COLORS_TOGGLE, POINT));
        assert!(a.is_shown(Panel::Colors));
        assert_eq!(a.toggles[0].label, "HIDE");

        // finger lingers: nothing happens during the cooldown
        for _ in 0..TOGGLE_COOLDOWN - 1 {
            a.step(at(COLORS_TOGGLE, POINT));
            assert!(a.is_shown(Panel::Colors));
            assert_eq!(a.toggles[0].alpha, DEFAULT_ALPHA);
        }

        // cooldown elapsed: fires again
        a.step(at(COLORS_TOGGLE, POINT));
        assert!(!a.is_shown(Panel::Colors));
        assert_eq!(a.toggles[0].label, "COLORS");
        assert_eq!(a.toggles[0].alpha, HOVER_ALPHA);
    }

    #[test]
    fn cooldown_is_shared_between_toggles() {
        let mut a = app();
        a.step(at(COLORS_TOGGLE, POINT));
        a.step(at(BOARD_TOGGLE, POINT));
        assert!(a.is_shown(Panel::Colors));
        assert!(!a.is_shown(Panel::Board));
    }

    #[test]
    fn cooldown_does_not_gate_swatches() {
        let mut a = app();
        a.step(at(COLORS_TOGGLE, POINT));
        // still cooling down, swatches respond anyway
        a.step(at(RED_SWATCH, POINT));
        assert_eq!(a.color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn toggles_are_locked_at_startup() {
        let mut a = PaintApp::with_first_swatch(1280, 720, Color::WHITE);
        for _ in 0..STARTUP_COOLDOWN - 1 {
            a.step(at(BOARD_TOGGLE, POINT));
        }
        assert!(!a.is_shown(Panel::Board));
        a.step(at(BOARD_TOGGLE, POINT));
        assert!(a.is_shown(Panel::Board));
    }

    #[test]
    fn render_overlays_canvas_and_board() {
        let mut a = app();
        toggle(&mut a, BOARD_TOGGLE);
        a.step(at(Point::new(600, 300), POINT));

        let mut frame = FrameBuffer::new(1280, 720);
        a.render(&mut frame).unwrap();
        // board: black frame * 0.6 + white * 0.4 + 1
        assert_eq!(frame.get(1000, 650), Some(Color::rgb(103, 103, 103).0));
        // stroke: blue added under the board, then the board blended on top
        let (r, g, b) = Color(frame.get(600, 300).unwrap()).channels();
        assert!(b > r && b > g);
        // colors panel hidden
        assert_eq!(frame.get(450, 50), Some(0));
    }

    #[test]
    fn tracker_drives_the_app() {
        let tip = Point::new(250, 50);
        let mut tracker = FixtureTracker::new([vec![], vec![hand_pose(tip, POINT)]]);
        let mut a = app();
        let mut frame = FrameBuffer::new(1280, 720);

        tracker.detect(&mut frame).unwrap();
        let input = HandInput::from_tracker(&tracker);
        assert_eq!(input, None);
        assert_eq!(a.step(input), Mode::Idle);

        tracker.detect(&mut frame).unwrap();
        let input = HandInput::from_tracker(&tracker);
        assert_eq!(input, Some(HandInput { tip, fingers: POINT }));
        assert_eq!(a.step(input), Mode::Navigation);
        assert!(a.is_shown(Panel::Colors));
    }
}
