// Hand landmarks and the finger-up classification the painter is driven by.
//
// A `HandTracker` runs some landmark model over a frame and remembers the
// 21 pixel-space keypoints of every hand it found. Everything the app needs
// from a hand (fingertip, which fingers are extended) is derived from those
// points, so any backend that can produce them works.
// Visual: optional skeleton overlay (bones as thick lines, joints as dots).

use crate::error::Error;
use crate::types::{Color, FrameBuffer, Point};
use crate::draw::{draw_thick_line, fill_disc};

/// Hand landmark indices (MediaPipe hand landmark model convention).
#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    pub const COUNT: usize = 21;
}

use landmarks::*;

/// Skeleton edges drawn over a detected hand.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_FINGER_MCP), (INDEX_FINGER_MCP, INDEX_FINGER_PIP),
    (INDEX_FINGER_PIP, INDEX_FINGER_DIP), (INDEX_FINGER_DIP, INDEX_FINGER_TIP),
    (INDEX_FINGER_MCP, MIDDLE_FINGER_MCP), (MIDDLE_FINGER_MCP, MIDDLE_FINGER_PIP),
    (MIDDLE_FINGER_PIP, MIDDLE_FINGER_DIP), (MIDDLE_FINGER_DIP, MIDDLE_FINGER_TIP),
    (MIDDLE_FINGER_MCP, RING_FINGER_MCP), (RING_FINGER_MCP, RING_FINGER_PIP),
    (RING_FINGER_PIP, RING_FINGER_DIP), (RING_FINGER_DIP, RING_FINGER_TIP),
    (RING_FINGER_MCP, PINKY_MCP), (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
];

/// Minimum horizontal gap (px) between the index base and the thumb tip for
/// the thumb to count as extended. Smaller gaps are a thumb folded over a fist.
pub const THUMB_GAP_PX: i32 = 10;

/// Which fingers are extended on one hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fingers {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl Fingers {
    /// Thumb to pinky.
    pub fn as_array(self) -> [bool; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
    }

    #[cfg(test)]
    pub fn from_array([thumb, index, middle, ring, pinky]: [bool; 5]) -> Self {
        Self { thumb, index, middle, ring, pinky }
    }
}

/// Classify extended fingers from one landmark set.
/// Returns None unless all 21 points are present.
pub fn classify(lm: &[Point]) -> Option<Fingers> {
    if lm.len() < COUNT {
        return None;
    }
    // tip above its inner joint, and clear of the index base horizontally
    let thumb = lm[THUMB_TIP].y < lm[THUMB_IP].y
        && lm[INDEX_FINGER_MCP].x - lm[THUMB_TIP].x > THUMB_GAP_PX;
    // tip, DIP, PIP strictly rising up the image
    let finger = |tip: usize, dip: usize, pip: usize| lm[tip].y < lm[dip].y && lm[dip].y < lm[pip].y;

    Some(Fingers {
        thumb,
        index: finger(INDEX_FINGER_TIP, INDEX_FINGER_DIP, INDEX_FINGER_PIP),
        middle: finger(MIDDLE_FINGER_TIP, MIDDLE_FINGER_DIP, MIDDLE_FINGER_PIP),
        ring: finger(RING_FINGER_TIP, RING_FINGER_DIP, RING_FINGER_PIP),
        pinky: finger(PINKY_TIP, PINKY_DIP, PINKY_PIP),
    })
}

/// A landmark model the painter can query once per frame.
pub trait HandTracker {
    /// Run the model on `frame`, replacing the last result. Backends may draw
    /// the detected skeleton onto the frame.
    fn detect(&mut self, frame: &mut FrameBuffer) -> Result<(), Error>;

    /// Pixel landmarks of hand `hand` from the last detection, or an empty
    /// slice when there is no such hand.
    fn landmarks(&self, hand: usize) -> &[Point];

    /// Extended fingers of the first hand, None when no hand was seen.
    fn fingers_up(&self) -> Option<Fingers> {
        classify(self.landmarks(0))
    }
}

const SKELETON_COLOR: Color = Color::rgb(255, 255, 255);
const JOINT_COLOR: Color = Color::rgb(255, 0, 0);

/// Draw bones and joints of one hand on top of the frame.
pub fn draw_hand(frame: &mut FrameBuffer, lm: &[Point]) {
    if lm.len() < COUNT {
        return;
    }
    for &(a, b) in &HAND_CONNECTIONS {
        draw_thick_line(frame, lm[a], lm[b], 2, SKELETON_COLOR);
    }
    for &p in &lm[..COUNT] {
        fill_disc(frame, p, 3, JOINT_COLOR);
    }
}

/// Replays canned landmark sets, one per `detect` call; empty once exhausted.
#[cfg(test)]
pub struct FixtureTracker {
    frames: std::collections::VecDeque<Vec<Vec<Point>>>,
    hands: Vec<Vec<Point>>,
    draw_landmarks: bool,
}

#[cfg(test)]
impl FixtureTracker {
    pub fn new(frames: impl IntoIterator<Item = Vec<Vec<Point>>>) -> Self {
        Self { frames: frames.into_iter().collect(), hands: Vec::new(), draw_landmarks: false }
    }

    pub fn drawing_landmarks(mut self) -> Self {
        self.draw_landmarks = true;
        self
    }
}

#[cfg(test)]
impl HandTracker for FixtureTracker {
    fn detect(&mut self, frame: &mut FrameBuffer) -> Result<(), Error> {
        self.hands = self.frames.pop_front().unwrap_or_default();
        if self.draw_landmarks {
            for hand in &self.hands {
                draw_hand(frame, hand);
            }
        }
        Ok(())
    }

    fn landmarks(&self, hand: usize) -> &[Point] {
        self.hands.get(hand).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Build a synthetic hand whose index tip sits at `tip` and whose fingers
/// classify exactly as `fingers`.
#[cfg(test)]
pub fn hand_pose(tip: Point, fingers: Fingers) -> Vec<Point> {
    // Layout relative to the index MCP at (0, 0); y grows down.
    let mut lm = vec![Point::default(); COUNT];
    lm[WRIST] = Point::new(20, 100);
    lm[THUMB_CMC] = Point::new(-10, 80);
    lm[THUMB_MCP] = Point::new(-25, 60);
    lm[THUMB_IP] = Point::new(-35, 40);
    lm[THUMB_TIP] = if fingers.thumb { Point::new(-45, 20) } else { Point::new(5, 50) };

    let fingers_up = [fingers.index, fingers.middle, fingers.ring, fingers.pinky];
    for (i, up) in fingers_up.into_iter().enumerate() {
        let base = INDEX_FINGER_MCP + 4 * i;
        let x = 25 * i as i32;
        lm[base] = Point::new(x, 0);
        lm[base + 1] = Point::new(x, -30);
        if up {
            lm[base + 2] = Point::new(x, -50);
            lm[base + 3] = Point::new(x, -70);
        } else {
            // curled: tip folds back below the middle joint
            lm[base + 2] = Point::new(x, -20);
            lm[base + 3] = Point::new(x, -5);
        }
    }

    let shift = Point::new(tip.x - lm[INDEX_FINGER_TIP].x, tip.y - lm[INDEX_FINGER_TIP].y);
    lm.iter().map(|p| Point::new(p.x + shift.x, p.y + shift.y)).collect()
}
