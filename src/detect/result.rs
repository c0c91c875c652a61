use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis-aligned box in the frame's coordinate space (pixels or normalized 0..1,
/// uniform within one frame). Serialized as `[xmin, ymin, xmax, ymax]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// True when `xmin <= xmax` and `ymin <= ymax`.
    pub fn is_well_formed(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }

    /// Grow the box on every side by `margin` times its own width/height.
    pub fn expanded(&self, margin: f64) -> Self {
        let dx = margin * self.width();
        let dy = margin * self.height();
        Self {
            xmin: self.xmin - dx,
            ymin: self.ymin - dy,
            xmax: self.xmax + dx,
            ymax: self.ymax + dy,
        }
    }

    /// Full containment, edges inclusive. Overlap alone is not enough.
    pub fn contains(&self, inner: &BoundingBox) -> bool {
        inner.xmin >= self.xmin
            && inner.ymin >= self.ymin
            && inner.xmax <= self.xmax
            && inner.ymax <= self.ymax
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        b.to_array()
    }
}

/// Body part classes the detector reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPart {
    Head,
    Hand,
    Foot,
    Face,
    Ear,
}

impl BodyPart {
    pub const ALL: [BodyPart; 5] = [
        BodyPart::Head,
        BodyPart::Hand,
        BodyPart::Foot,
        BodyPart::Face,
        BodyPart::Ear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Hand => "hand",
            BodyPart::Foot => "foot",
            BodyPart::Face => "face",
            BodyPart::Ear => "ear",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|part| part.as_str() == label)
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protective equipment classes the detector reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Equipment {
    Hardhat,
    Gloves,
    Shoes,
    Safetyvest,
    Safetysuit,
    Faceguard,
    Facemask,
    Earmuffs,
    Glasses,
}

impl Equipment {
    pub const ALL: [Equipment; 9] = [
        Equipment::Hardhat,
        Equipment::Gloves,
        Equipment::Shoes,
        Equipment::Safetyvest,
        Equipment::Safetysuit,
        Equipment::Faceguard,
        Equipment::Facemask,
        Equipment::Earmuffs,
        Equipment::Glasses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Equipment::Hardhat => "hardhat",
            Equipment::Gloves => "gloves",
            Equipment::Shoes => "shoes",
            Equipment::Safetyvest => "safetyvest",
            Equipment::Safetysuit => "safetysuit",
            Equipment::Faceguard => "faceguard",
            Equipment::Facemask => "facemask",
            Equipment::Earmuffs => "earmuffs",
            Equipment::Glasses => "glasses",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == label)
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PERSON_LABEL: &str = "person";

/// Category of a detection, resolved once from the detector's label string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectClass {
    Person,
    BodyPart(BodyPart),
    Equipment(Equipment),
    /// Anything outside the known label sets. Never assigned to a person.
    Unrecognized,
}

impl ObjectClass {
    /// Exact, case-sensitive match against the detector's label vocabulary.
    pub fn from_label(label: &str) -> Self {
        if label == PERSON_LABEL {
            return ObjectClass::Person;
        }
        if let Some(part) = BodyPart::from_label(label) {
            return ObjectClass::BodyPart(part);
        }
        if let Some(item) = Equipment::from_label(label) {
            return ObjectClass::Equipment(item);
        }
        ObjectClass::Unrecognized
    }

    pub fn is_person(&self) -> bool {
        matches!(self, ObjectClass::Person)
    }
}

/// Tracker-assigned person identity. Opaque to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One detector observation for a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub class: ObjectClass,
    pub bbox: BoundingBox,
    pub confidence: f64,
    /// Only persons carry a tracker identity.
    pub person_id: Option<PersonId>,
}

impl Detection {
    pub fn person(person_id: impl Into<String>, bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            class: ObjectClass::Person,
            bbox,
            confidence,
            person_id: Some(PersonId::new(person_id)),
        }
    }

    /// Build a non-person detection from a raw label. A `"person"` label built
    /// this way has no identity.
    pub fn object(label: &str, bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            class: ObjectClass::from_label(label),
            bbox,
            confidence,
            person_id: None,
        }
    }
}
