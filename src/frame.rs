//! Per-frame output snapshot.
//!
//! A `FrameSnapshot` is the only thing the engine produces for a frame: one
//! `PersonRecord` per person, in the order persons were detected, each carrying
//! the items attributed to it and its violations. Field names match the
//! interchange format consumed downstream:
//!
//! ```json
//! {
//!   "camera_id": "cam_1",
//!   "frame_id": "000123",
//!   "timestamp": 1704672345123,
//!   "person": [{
//!     "person_id": "004",
//!     "bbox": [100.0, 150.0, 200.0, 350.0],
//!     "confidence": 0.95,
//!     "part": [{ "label": "hand", "bbox": [120.0, 280.0, 160.0, 320.0], "confidence": 0.87 }],
//!     "equipment": [],
//!     "violation": ["missing_gloves"]
//!   }]
//! }
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::compliance::{check_compliance, ViolationKind};
use crate::detect::{AssignedEquipment, AssignedPart, BoundingBox, PersonAssignment, PersonId};

/// Width of the zero-padded frame counter used as `frame_id`.
pub const FRAME_ID_WIDTH: usize = 6;

/// Format a frame counter the way frame ids appear on the wire (`42` -> `"000042"`).
pub fn frame_id_from_index(index: u64) -> String {
    format!("{:0width$}", index, width = FRAME_ID_WIDTH)
}

/// Identity of the frame a snapshot describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameMeta {
    pub camera_id: String,
    pub frame_id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl FrameMeta {
    pub fn new(camera_id: impl Into<String>, frame_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            camera_id: camera_id.into(),
            frame_id: frame_id.into(),
            timestamp,
        }
    }
}

/// Compliance result for one person.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonRecord {
    pub person_id: PersonId,
    pub bbox: BoundingBox,
    pub confidence: f64,
    pub part: Vec<AssignedPart>,
    pub equipment: Vec<AssignedEquipment>,
    pub violation: Vec<ViolationKind>,
}

impl PersonRecord {
    /// Classify one assignment and fold it into a record.
    pub fn from_assignment(assignment: PersonAssignment) -> Self {
        let violation = check_compliance(&assignment);
        Self {
            person_id: assignment.person_id,
            bbox: assignment.bbox,
            confidence: assignment.confidence,
            part: assignment.parts,
            equipment: assignment.equipment,
            violation,
        }
    }
}

/// Complete engine output for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameSnapshot {
    pub camera_id: String,
    pub frame_id: String,
    pub timestamp: i64,
    pub person: Vec<PersonRecord>,
}

impl FrameSnapshot {
    pub fn violation_count(&self) -> usize {
        self.person.iter().map(|p| p.violation.len()).sum()
    }

    pub fn has_violations(&self) -> bool {
        self.person.iter().any(|p| !p.violation.is_empty())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Classify each assignment and collect the records in assignment order.
pub fn assemble_snapshot(meta: FrameMeta, assignments: Vec<PersonAssignment>) -> FrameSnapshot {
    let person: Vec<PersonRecord> = assignments
        .into_iter()
        .map(PersonRecord::from_assignment)
        .collect();

    for record in person.iter().filter(|r| !r.violation.is_empty()) {
        log::info!(
            "[{}] person {}: {} violation(s)",
            meta.camera_id,
            record.person_id,
            record.violation.len()
        );
    }

    FrameSnapshot {
        camera_id: meta.camera_id,
        frame_id: meta.frame_id,
        timestamp: meta.timestamp,
        person,
    }
}
