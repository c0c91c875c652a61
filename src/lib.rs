//! PPE Compliance Engine
//!
//! This crate turns one frame's worth of detector output into a
//! violation-annotated snapshot of every person in the frame.
//!
//! # Architecture
//!
//! Each frame runs through two stages:
//!
//! 1. **Assignment**: body parts and equipment are attributed to every person
//!    whose margin-grown box fully contains them (`detect`).
//! 2. **Compliance**: a fixed table of body-part/equipment rules yields each
//!    person's ordered violation list (`compliance`).
//!
//! The results are collected into a `FrameSnapshot` (`frame`) in person
//! discovery order.
//!
//! The engine keeps no state between frames. A `ComplianceEngine` only holds
//! its immutable parameters, so one instance can serve any number of frames
//! and cameras from any thread.
//!
//! # Module Structure
//!
//! - `detect`: Detection data model and the assignment resolver
//! - `compliance`: Violation kinds and the rule table
//! - `frame`: Snapshot assembly and the wire-facing record types
//! - `ingest`: Producer-side filtering of raw detector frames
//! - `config`: Host settings (file + environment)

pub mod compliance;
pub mod config;
pub mod detect;
pub mod frame;
pub mod ingest;

pub use compliance::{check_compliance, ComplianceRule, ViolationKind, RULES};
pub use detect::{
    assign_detections_to_persons, Assigned, BodyPart, BoundingBox, Detection, Equipment,
    ObjectClass, PersonAssignment, PersonId, DEFAULT_CONTAINMENT_MARGIN,
};
pub use frame::{assemble_snapshot, frame_id_from_index, FrameMeta, FrameSnapshot, PersonRecord};
pub use ingest::{FrameFilter, PreparedFrame, RawDetection, RawFrame};

/// Per-frame association and compliance pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComplianceEngine {
    margin: f64,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINMENT_MARGIN)
    }
}

impl ComplianceEngine {
    /// `margin` is the fraction of a person's width/height added to each side
    /// of its box before containment is tested.
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Assign, classify and assemble one frame.
    pub fn process(&self, meta: FrameMeta, detections: &[Detection]) -> FrameSnapshot {
        let assignments = assign_detections_to_persons(detections, self.margin);
        assemble_snapshot(meta, assignments)
    }

    pub fn process_prepared(&self, frame: PreparedFrame) -> FrameSnapshot {
        self.process(frame.meta, &frame.detections)
    }
}

/// Run one frame through the default engine.
pub fn process_frame(meta: FrameMeta, detections: &[Detection]) -> FrameSnapshot {
    ComplianceEngine::default().process(meta, detections)
}
