use crate::detect::{BoundingBox, Detection, ObjectClass};
use crate::frame::{frame_id_from_index, FrameMeta};

use super::raw::{RawDetection, RawFrame};

/// Detections scoring below this are dropped before they reach the engine.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

/// Engine-ready input for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedFrame {
    pub meta: FrameMeta,
    pub detections: Vec<Detection>,
}

/// Producer-side filtering applied to each raw frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameFilter {
    pub min_confidence: f64,
}

impl Default for FrameFilter {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl FrameFilter {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    /// Convert a raw frame into engine input. Returns `None` when no tracked
    /// person survives filtering; such frames carry nothing to check.
    pub fn prepare(&self, raw: RawFrame) -> Option<PreparedFrame> {
        let detections: Vec<Detection> = raw
            .detections
            .iter()
            .filter_map(|det| self.convert(det))
            .collect();

        if !detections.iter().any(|d| d.class.is_person()) {
            log::debug!(
                "[{}] no persons detected in frame {}",
                raw.camera_id,
                raw.frame_index
            );
            return None;
        }

        Some(PreparedFrame {
            meta: FrameMeta::new(
                raw.camera_id,
                frame_id_from_index(raw.frame_index),
                raw.timestamp,
            ),
            detections,
        })
    }

    fn convert(&self, det: &RawDetection) -> Option<Detection> {
        if det.confidence < self.min_confidence {
            return None;
        }
        let bbox = BoundingBox::from(det.bbox);
        match ObjectClass::from_label(&det.label) {
            ObjectClass::Person => {
                let track_id = det.track_id?;
                Some(Detection::person(
                    format!("{:03}", track_id),
                    bbox,
                    det.confidence,
                ))
            }
            _ => Some(Detection::object(&det.label, bbox, det.confidence)),
        }
    }
}
