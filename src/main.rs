// What you SEE:
// • The mirrored camera feed, with your painting added on top.
// • Point with only your index finger to press the buttons along the top:
//   BOARD shows the white drawing board, COLORS the swatches + CLEAR,
//   PEN the brush sizes.
// • Index up, middle finger down, over the board: you paint.
// • Q (or ESC) quits.

mod app;
mod bridge;
mod camera;
mod canvas;
mod config;
mod draw;
mod error;
mod hand;
mod types;
mod ui;

use std::time::{Duration, Instant};

use app::{HandInput, PaintApp};
use bridge::MediaPipeBridge;
use camera::CameraCapture;
use config::{Config, FRAME_HEIGHT, FRAME_WIDTH, WINDOW_TITLE};
use draw::Drawer;
use error::Error;
use hand::HandTracker;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::from_env();

    /* --- Camera, landmarker, window --- */
    let mut cam = CameraCapture::new(cfg.camera_index, FRAME_WIDTH as u32, FRAME_HEIGHT as u32)?;
    let mut tracker = MediaPipeBridge::spawn(&cfg.tracker)?;
    let mut drawer = Drawer::new(WINDOW_TITLE, FRAME_WIDTH, FRAME_HEIGHT)?;

    /* --- Painting + buttons --- */
    let mut app = PaintApp::new(FRAME_WIDTH, FRAME_HEIGHT);

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.quit_pressed() {
        // 1) Live frame; a dead camera ends the session
        let mut frame = match cam.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "camera stopped delivering frames");
                break;
            }
        };

        // 2) Hands (skeleton is drawn onto the frame when enabled)
        tracker.detect(&mut frame)?;
        let input = HandInput::from_tracker(&tracker);

        // 3) Gesture -> buttons / strokes
        let mode = app.step(input);
        tracing::trace!(?mode, fingers = ?input.map(|h| h.fingers.as_array()), "frame");

        // 4) Painting + UI on top, then show it
        app.render(&mut frame)?;
        drawer.present(&frame)?;

        // 5) FPS, once per second
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            tracing::debug!(
                fps = %format!("{fps:.1}"),
                color = %format!("#{:06x}", app.color().0),
                brush = app.brush_size(),
                "frame rate"
            );
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    tracing::info!("paint app closed");
    Ok(())
}
