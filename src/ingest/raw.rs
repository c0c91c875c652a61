use anyhow::{anyhow, Result};
use serde::Deserialize;

/// One detection as reported by the detector/tracker.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RawDetection {
    pub label: String,
    /// `[xmin, ymin, xmax, ymax]`
    pub bbox: [f64; 4],
    pub confidence: f64,
    /// Tracker identity. Only meaningful for persons.
    #[serde(default)]
    pub track_id: Option<u64>,
}

/// Detector output for one frame of one camera.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RawFrame {
    pub camera_id: String,
    /// Monotonic per-camera frame counter.
    pub frame_index: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default)]
    pub detections: Vec<RawDetection>,
}

/// Parse one JSON-encoded `RawFrame`.
pub fn parse_raw_frame(payload: &[u8]) -> Result<RawFrame> {
    let frame: RawFrame =
        serde_json::from_slice(payload).map_err(|e| anyhow!("parse error: {}", e))?;
    if frame.camera_id.trim().is_empty() {
        return Err(anyhow!("camera_id must not be empty"));
    }
    Ok(frame)
}
