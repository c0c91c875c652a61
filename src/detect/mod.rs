mod association;
mod result;

pub use association::{
    assign_detections_to_persons, is_contained, split_detections, Assigned, AssignedEquipment,
    AssignedPart, PersonAssignment, DEFAULT_CONTAINMENT_MARGIN,
};
pub use result::{
    BodyPart, BoundingBox, Detection, Equipment, ObjectClass, PersonId, PERSON_LABEL,
};
