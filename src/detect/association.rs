//! Assignment of body parts and equipment to the persons that contain them.
//!
//! A non-person detection belongs to a person when its box lies fully inside
//! the person's box grown by a margin of the person's own width/height. A
//! detection inside several persons is attributed to every one of them; there
//! is no closest-person or best-overlap tie-break. Detections inside no person,
//! and detections with labels outside the body-part/equipment vocabulary, are
//! dropped.

use serde::{Deserialize, Serialize};

use super::result::{BodyPart, BoundingBox, Detection, Equipment, ObjectClass, PersonId};

/// Margin ratio applied to each side of a person box before the containment test.
pub const DEFAULT_CONTAINMENT_MARGIN: f64 = 0.05;

/// A labeled item attributed to a person. Serializes as `{label, bbox, confidence}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assigned<L> {
    pub label: L,
    pub bbox: BoundingBox,
    pub confidence: f64,
}

pub type AssignedPart = Assigned<BodyPart>;
pub type AssignedEquipment = Assigned<Equipment>;

/// Everything attributed to one person in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonAssignment {
    /// Position of the person among the frame's person detections.
    pub index: usize,
    pub person_id: PersonId,
    pub bbox: BoundingBox,
    pub confidence: f64,
    /// Body parts in discovery order.
    pub parts: Vec<AssignedPart>,
    /// Equipment in discovery order.
    pub equipment: Vec<AssignedEquipment>,
}

impl PersonAssignment {
    fn new(index: usize, person: &Detection) -> Self {
        Self {
            index,
            person_id: person.person_id.clone().unwrap_or_default(),
            bbox: person.bbox,
            confidence: person.confidence,
            parts: Vec::new(),
            equipment: Vec::new(),
        }
    }

    pub fn has_part(&self, part: BodyPart) -> bool {
        self.parts.iter().any(|p| p.label == part)
    }

    pub fn has_equipment(&self, item: Equipment) -> bool {
        self.equipment.iter().any(|e| e.label == item)
    }
}

/// Split a frame's detections into persons and everything else, keeping input
/// order within each group.
pub fn split_detections(detections: &[Detection]) -> (Vec<&Detection>, Vec<&Detection>) {
    detections.iter().partition(|d| d.class.is_person())
}

/// True when `inner` lies inside `outer` grown by `margin` on every side.
pub fn is_contained(inner: &BoundingBox, outer: &BoundingBox, margin: f64) -> bool {
    outer.expanded(margin).contains(inner)
}

/// Attribute every body part and equipment detection to each person whose
/// margin-grown box contains it. Returns one assignment per person, in the
/// order persons appear in `detections`.
pub fn assign_detections_to_persons(
    detections: &[Detection],
    margin: f64,
) -> Vec<PersonAssignment> {
    debug_assert!(
        detections.iter().all(|d| d.bbox.is_well_formed()),
        "detection boxes must satisfy xmin <= xmax and ymin <= ymax"
    );

    let (persons, others) = split_detections(detections);

    persons
        .iter()
        .enumerate()
        .map(|(index, person)| {
            let mut assignment = PersonAssignment::new(index, person);
            let expanded = person.bbox.expanded(margin);

            for det in others.iter().filter(|d| expanded.contains(&d.bbox)) {
                match det.class {
                    ObjectClass::BodyPart(label) => assignment.parts.push(Assigned {
                        label,
                        bbox: det.bbox,
                        confidence: det.confidence,
                    }),
                    ObjectClass::Equipment(label) => assignment.equipment.push(Assigned {
                        label,
                        bbox: det.bbox,
                        confidence: det.confidence,
                    }),
                    ObjectClass::Person | ObjectClass::Unrecognized => {}
                }
            }
            assignment
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, bbox: [f64; 4]) -> Detection {
        Detection::person(id, bbox.into(), 0.9)
    }

    fn object(label: &str, bbox: [f64; 4]) -> Detection {
        Detection::object(label, bbox.into(), 0.8)
    }

    #[test]
    fn strictly_inside_is_assigned() {
        let dets = vec![
            person("001", [100.0, 100.0, 200.0, 400.0]),
            object("hand", [120.0, 280.0, 160.0, 320.0]),
        ];
        let out = assign_detections_to_persons(&dets, DEFAULT_CONTAINMENT_MARGIN);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].parts.len(), 1);
        assert_eq!(out[0].parts[0].label, BodyPart::Hand);
    }

    #[test]
    fn margin_admits_items_slightly_past_the_edge() {
        // Person is 100 wide and 300 tall: margin grows it by 5 and 15.
        let dets = vec![
            person("001", [100.0, 100.0, 200.0, 400.0]),
            object("hardhat", [96.0, 86.0, 150.0, 120.0]),
            object("shoes", [150.0, 380.0, 204.0, 414.0]),
        ];
        let out = assign_detections_to_persons(&dets, DEFAULT_CONTAINMENT_MARGIN);
        let labels: Vec<Equipment> = out[0].equipment.iter().map(|e| e.label).collect();
        assert_eq!(labels, vec![Equipment::Hardhat, Equipment::Shoes]);
    }

    #[test]
    fn outside_margin_or_partial_overlap_is_not_assigned() {
        let dets = vec![
            person("001", [100.0, 100.0, 200.0, 400.0]),
            object("gloves", [300.0, 300.0, 320.0, 320.0]),
            object("gloves", [190.0, 200.0, 230.0, 240.0]),
            object("head", [94.0, 120.0, 120.0, 140.0]),
        ];
        let out = assign_detections_to_persons(&dets, DEFAULT_CONTAINMENT_MARGIN);
        assert!(out[0].parts.is_empty());
        assert!(out[0].equipment.is_empty());
    }

    #[test]
    fn zero_margin_requires_plain_containment() {
        let dets = vec![
            person("001", [100.0, 100.0, 200.0, 400.0]),
            object("hardhat", [96.0, 100.0, 150.0, 120.0]),
        ];
        let out = assign_detections_to_persons(&dets, 0.0);
        assert!(out[0].equipment.is_empty());
    }

    #[test]
    fn overlapping_persons_both_receive_shared_item() {
        let dets = vec![
            person("001", [0.0, 0.0, 100.0, 200.0]),
            person("002", [50.0, 0.0, 150.0, 200.0]),
            object("gloves", [60.0, 100.0, 90.0, 130.0]),
        ];
        let out = assign_detections_to_persons(&dets, DEFAULT_CONTAINMENT_MARGIN);
        assert_eq!(out.len(), 2);
        assert!(out[0].has_equipment(Equipment::Gloves));
        assert!(out[1].has_equipment(Equipment::Gloves));
    }

    #[test]
    fn unrecognized_labels_and_persons_are_never_items() {
        let dets = vec![
            person("001", [0.0, 0.0, 100.0, 200.0]),
            person("002", [10.0, 10.0, 50.0, 100.0]),
            object("forklift", [20.0, 20.0, 30.0, 30.0]),
        ];
        let out = assign_detections_to_persons(&dets, DEFAULT_CONTAINMENT_MARGIN);
        for a in &out {
            assert!(a.parts.is_empty());
            assert!(a.equipment.is_empty());
        }
    }

    #[test]
    fn empty_inputs_are_valid() {
        assert!(assign_detections_to_persons(&[], DEFAULT_CONTAINMENT_MARGIN).is_empty());

        let only_items = vec![object("hand", [0.0, 0.0, 1.0, 1.0])];
        assert!(assign_detections_to_persons(&only_items, DEFAULT_CONTAINMENT_MARGIN).is_empty());

        let only_person = vec![person("007", [0.0, 0.0, 1.0, 1.0])];
        let out = assign_detections_to_persons(&only_person, DEFAULT_CONTAINMENT_MARGIN);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].person_id.as_str(), "007");
    }

    #[test]
    fn persons_keep_input_order_and_items_keep_discovery_order() {
        let dets = vec![
            object("hand", [10.0, 10.0, 20.0, 20.0]),
            person("b", [0.0, 0.0, 100.0, 100.0]),
            object("head", [30.0, 5.0, 50.0, 25.0]),
            person("a", [0.0, 0.0, 100.0, 100.0]),
            object("foot", [40.0, 80.0, 60.0, 95.0]),
        ];
        let out = assign_detections_to_persons(&dets, DEFAULT_CONTAINMENT_MARGIN);
        let ids: Vec<&str> = out.iter().map(|a| a.person_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(out[1].index, 1);
        let parts: Vec<BodyPart> = out[0].parts.iter().map(|p| p.label).collect();
        assert_eq!(parts, vec![BodyPart::Hand, BodyPart::Head, BodyPart::Foot]);
    }

    #[test]
    fn repeated_runs_yield_identical_assignments() {
        let dets = vec![
            person("001", [0.0, 0.0, 100.0, 200.0]),
            person("002", [50.0, 0.0, 150.0, 200.0]),
            object("gloves", [60.0, 100.0, 90.0, 130.0]),
            object("ear", [10.0, 10.0, 20.0, 20.0]),
        ];
        let first = assign_detections_to_persons(&dets, DEFAULT_CONTAINMENT_MARGIN);
        let second = assign_detections_to_persons(&dets, DEFAULT_CONTAINMENT_MARGIN);
        assert_eq!(first, second);
    }
}
