//! PPE compliance rules.
//!
//! Each rule pairs one body part with one piece of equipment. A rule only
//! fires when its body part is visible on the person; equipment seen without
//! its body part is treated as covering it and raises nothing.
//!
//! For gloves, shoes, earmuffs and facemasks, seeing both the body part and the
//! equipment means the equipment is not covering the part, which is reported
//! as improper wear. Head plus hardhat is the exception and counts as
//! compliant.
//!
//! A face/glasses rule (glasses required over a visible face, or over the head
//! when a facemask hides the face) has no entry in [`RULES`] and is never
//! evaluated.

mod rules;

pub use rules::{check_compliance, ComplianceRule, ViolationKind, RULES};
