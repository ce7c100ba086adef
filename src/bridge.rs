// MediaPipe hand landmarker running in a Python child process.
//
// Protocol (see `scripts/hand_landmarker.py`):
// - the child prints `READY` once the model is loaded;
// - per frame we write `width`, `height`, `channels` as little-endian u32,
//   then `width * height * 3` packed RGB bytes;
// - the child answers one JSON line with normalized landmarks per hand.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::Deserialize;

use crate::config::TrackerConfig;
use crate::error::Error;
use crate::hand::{self, landmarks, HandTracker};
use crate::types::{split_rgb, FrameBuffer, Point};

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[allow(dead_code)]
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Turn one JSON response line into pixel landmark sets.
///
/// Hands without exactly 21 landmarks are dropped; at most `max_hands` are
/// kept, in the order the model reported them. `score` is the left/right
/// classification score: detection confidence is already applied by the
/// model itself, so every hand it reports is used.
pub fn parse_response(
    line: &str,
    width: usize,
    height: usize,
    max_hands: usize,
) -> Result<Vec<Vec<Point>>, Error> {
    let result: DetectionResult = serde_json::from_str(line.trim())
        .map_err(|e| Error::TrackerProtocol(format!("bad JSON {:?}: {e}", line.trim())))?;

    if let Some(error) = result.error {
        tracing::warn!(%error, "landmarker reported an error");
        return Ok(Vec::new());
    }

    let mut hands = Vec::new();
    for hand in result.hands {
        if hands.len() >= max_hands {
            break;
        }
        if hand.landmarks.len() != landmarks::COUNT {
            tracing::warn!(got = hand.landmarks.len(), "expected 21 landmarks");
            continue;
        }
        let points: Vec<Point> = hand
            .landmarks
            .iter()
            .map(|lm| Point::new((lm.x * width as f32) as i32, (lm.y * height as f32) as i32))
            .collect();
        tracing::trace!(
            handedness = %hand.handedness,
            score = hand.score,
            tip_x = points[landmarks::INDEX_FINGER_TIP].x,
            tip_y = points[landmarks::INDEX_FINGER_TIP].y,
            "hand"
        );
        hands.push(points);
    }
    Ok(hands)
}

/// Hand tracker backed by a MediaPipe subprocess.
pub struct MediaPipeBridge {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    max_hands: usize,
    draw_landmarks: bool,
    hands: Vec<Vec<Point>>,
    rgb: Vec<u8>, // reused upload buffer
    line: String,
}

impl MediaPipeBridge {
    /// Start the landmarker and wait for its READY line.
    pub fn spawn(cfg: &TrackerConfig) -> Result<Self, Error> {
        if !cfg.script.exists() {
            return Err(Error::TrackerSpawn(format!(
                "landmarker script not found at {}",
                cfg.script.display()
            )));
        }

        tracing::info!(python = %cfg.python.display(), script = %cfg.script.display(), "starting hand landmarker");

        let mut process = Command::new(&cfg.python)
            .arg(&cfg.script)
            .arg("--max-hands")
            .arg(cfg.max_hands.to_string())
            .arg("--min-confidence")
            .arg(cfg.detection_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::TrackerSpawn(format!("{}: {e}", cfg.python.display())))?;

        let (Some(stdin), Some(stdout)) = (process.stdin.take(), process.stdout.take()) else {
            reap(&mut process);
            return Err(Error::TrackerSpawn("child pipes unavailable".into()));
        };
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        if let Err(e) = stdout.read_line(&mut ready) {
            reap(&mut process);
            return Err(e.into());
        }
        if ready.trim() != "READY" {
            reap(&mut process);
            return Err(Error::TrackerSpawn(format!("expected READY, got {:?}", ready.trim())));
        }

        tracing::info!("hand landmarker ready");

        Ok(Self {
            process,
            stdin,
            stdout,
            max_hands: cfg.max_hands,
            draw_landmarks: cfg.draw_landmarks,
            hands: Vec::new(),
            rgb: Vec::new(),
            line: String::new(),
        })
    }

    fn send_frame(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        self.rgb.clear();
        self.rgb.reserve(frame.pixels.len() * 3);
        for &px in &frame.pixels {
            let (r, g, b) = split_rgb(px);
            self.rgb.extend_from_slice(&[r, g, b]);
        }

        self.stdin.write_all(&(frame.width as u32).to_le_bytes())?;
        self.stdin.write_all(&(frame.height as u32).to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(&self.rgb)?;
        self.stdin.flush()?;
        Ok(())
    }
}

impl HandTracker for MediaPipeBridge {
    fn detect(&mut self, frame: &mut FrameBuffer) -> Result<(), Error> {
        self.send_frame(frame)?;

        self.line.clear();
        if self.stdout.read_line(&mut self.line)? == 0 {
            return Err(Error::TrackerProtocol("landmarker closed its output".into()));
        }

        self.hands = parse_response(&self.line, frame.width, frame.height, self.max_hands)?;

        if self.draw_landmarks {
            for lm in &self.hands {
                hand::draw_hand(frame, lm);
            }
        }
        Ok(())
    }

    fn landmarks(&self, hand: usize) -> &[Point] {
        self.hands.get(hand).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Kill the child and collect its exit status so it doesn't linger as a zombie.
fn reap(process: &mut Child) {
    let _ = process.kill();
    let _ = process.wait();
}

impl Drop for MediaPipeBridge {
    fn drop(&mut self) {
        // Kill the Python subprocess when the tracker is dropped
        reap(&mut self.process);
    }
}
