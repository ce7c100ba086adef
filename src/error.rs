// One error type for the whole app.
// Every variant states *where* things went wrong.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String),
    #[error("window update error: {0}")]
    WindowUpdate(String),
    #[error("camera init error: {0}")]
    CameraInit(String),
    #[error("camera frame error: {0}")]
    CameraFrame(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("hand tracker failed to start: {0}")]
    TrackerSpawn(String),
    #[error("hand tracker i/o error: {0}")]
    TrackerIo(#[from] std::io::Error),
    #[error("hand tracker protocol error: {0}")]
    TrackerProtocol(String),
    #[error("invalid config {key}: {reason}")]
    Config { key: &'static str, reason: String },
}
