//! Producer boundary.
//!
//! The detector and tracker run outside this crate and hand over one
//! `RawFrame` per processed video frame. This module turns that payload into
//! the engine's input:
//! - Detections below the confidence floor are discarded
//! - Persons without a tracker id are discarded
//! - Tracker ids become zero-padded `PersonId`s, frame counters become frame ids
//! - Frames left with no person are skipped entirely
//!
//! The engine itself never re-filters; these rules belong to the producer.

mod filter;
mod raw;

pub use filter::{FrameFilter, PreparedFrame, DEFAULT_MIN_CONFIDENCE};
pub use raw::{parse_raw_frame, RawDetection, RawFrame};
