// Runtime configuration parsed from environment variables.
//
// Layout, brush sizes and cooldowns are fixed constants; only the camera and
// tracker plumbing can be changed from the environment.

use std::path::PathBuf;

use crate::error::Error;

/// Frame size the whole UI layout is designed for.
pub const FRAME_WIDTH: usize = 1280;
pub const FRAME_HEIGHT: usize = 720;

pub const WINDOW_TITLE: &str = "Paint App";

pub const DEFAULT_CAMERA_INDEX: u32 = 0;
pub const DEFAULT_TRACKER_PYTHON: &str = "python3";
pub const DEFAULT_TRACKER_SCRIPT: &str = "scripts/hand_landmarker.py";
pub const DEFAULT_DETECTION_CONFIDENCE: f32 = 0.8;
pub const DEFAULT_MAX_HANDS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub python: PathBuf,
    pub script: PathBuf,
    pub detection_confidence: f32,
    pub max_hands: usize,
    pub draw_landmarks: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub camera_index: u32,
    pub tracker: TrackerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: DEFAULT_CAMERA_INDEX,
            tracker: TrackerConfig {
                python: PathBuf::from(DEFAULT_TRACKER_PYTHON),
                script: PathBuf::from(DEFAULT_TRACKER_SCRIPT),
                detection_confidence: DEFAULT_DETECTION_CONFIDENCE,
                max_hands: DEFAULT_MAX_HANDS,
                draw_landmarks: true,
            },
        }
    }
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PAINTER_CAMERA_INDEX`: default 0
    /// - `PAINTER_TRACKER_PYTHON`: interpreter for the landmarker, default `python3`
    /// - `PAINTER_TRACKER_SCRIPT`: default `scripts/hand_landmarker.py`
    /// - `PAINTER_DETECTION_CONFIDENCE`: 0.0..=1.0, default 0.8
    /// - `PAINTER_MAX_HANDS`: default 2
    /// - `PAINTER_DRAW_LANDMARKS`: `true`/`false`, default true
    ///
    /// Invalid values are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let camera_index = or_default(
            lookup("PAINTER_CAMERA_INDEX").map(|v| parse_u32("PAINTER_CAMERA_INDEX", &v)),
            defaults.camera_index,
        );
        let python = lookup("PAINTER_TRACKER_PYTHON")
            .map(PathBuf::from)
            .unwrap_or(defaults.tracker.python);
        let script = lookup("PAINTER_TRACKER_SCRIPT")
            .map(PathBuf::from)
            .unwrap_or(defaults.tracker.script);
        let detection_confidence = or_default(
            lookup("PAINTER_DETECTION_CONFIDENCE").map(|v| parse_confidence(&v)),
            defaults.tracker.detection_confidence,
        );
        let max_hands = or_default(
            lookup("PAINTER_MAX_HANDS").map(|v| parse_max_hands(&v)),
            defaults.tracker.max_hands,
        );
        let draw_landmarks = or_default(
            lookup("PAINTER_DRAW_LANDMARKS").map(|v| parse_bool("PAINTER_DRAW_LANDMARKS", &v)),
            defaults.tracker.draw_landmarks,
        );

        Self {
            camera_index,
            tracker: TrackerConfig { python, script, detection_confidence, max_hands, draw_landmarks },
        }
    }
}

fn or_default<T: std::fmt::Debug>(parsed: Option<Result<T, Error>>, default: T) -> T {
    match parsed {
        None => default,
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            tracing::warn!(error = %e, ?default, "falling back to default");
            default
        }
    }
}

fn parse_u32(key: &'static str, raw: &str) -> Result<u32, Error> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| Error::Config { key, reason: format!("{raw:?}: {e}") })
}

fn parse_confidence(raw: &str) -> Result<f32, Error> {
    let key = "PAINTER_DETECTION_CONFIDENCE";
    let v = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| Error::Config { key, reason: format!("{raw:?}: {e}") })?;
    if v.is_nan() {
        return Err(Error::Config { key, reason: "NaN".into() });
    }
    Ok(v.clamp(0.0, 1.0))
}

fn parse_max_hands(raw: &str) -> Result<usize, Error> {
    let key = "PAINTER_MAX_HANDS";
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(Error::Config { key, reason: "must be at least 1".into() }),
        Ok(n) => Ok(n),
        Err(e) => Err(Error::Config { key, reason: format!("{raw:?}: {e}") }),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config { key, reason: format!("{raw:?} is not a boolean") }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn values_are_read() {
        let cfg = Config::from_lookup(lookup(&[
            ("PAINTER_CAMERA_INDEX", "2"),
            ("PAINTER_TRACKER_PYTHON", ".venv/bin/python"),
            ("PAINTER_DETECTION_CONFIDENCE", "0.6"),
            ("PAINTER_MAX_HANDS", "1"),
            ("PAINTER_DRAW_LANDMARKS", "off"),
        ]));
        assert_eq!(cfg.camera_index, 2);
        assert_eq!(cfg.tracker.python, PathBuf::from(".venv/bin/python"));
        assert_eq!(cfg.tracker.detection_confidence, 0.6);
        assert_eq!(cfg.tracker.max_hands, 1);
        assert!(!cfg.tracker.draw_landmarks);
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = Config::from_lookup(lookup(&[
            ("PAINTER_CAMERA_INDEX", "front"),
            ("PAINTER_MAX_HANDS", "0"),
            ("PAINTER_DRAW_LANDMARKS", "maybe"),
            ("PAINTER_DETECTION_CONFIDENCE", "NaN"),
        ]));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn confidence_is_clamped() {
        let cfg = Config::from_lookup(lookup(&[("PAINTER_DETECTION_CONFIDENCE", "3")]));
        assert_eq!(cfg.tracker.detection_confidence, 1.0);
    }
}
