use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detect::{BodyPart, Equipment, PersonAssignment};

/// Closed vocabulary of violation labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingHardhat,
    MissingGloves,
    MissingShoes,
    MissingFacemask,
    MissingEarmuffs,
    ImproperlyWornGloves,
    ImproperlyWornShoes,
    ImproperlyWornFacemask,
    ImproperlyWornEarmuffs,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 9] = [
        ViolationKind::MissingHardhat,
        ViolationKind::MissingGloves,
        ViolationKind::MissingShoes,
        ViolationKind::MissingFacemask,
        ViolationKind::MissingEarmuffs,
        ViolationKind::ImproperlyWornGloves,
        ViolationKind::ImproperlyWornShoes,
        ViolationKind::ImproperlyWornFacemask,
        ViolationKind::ImproperlyWornEarmuffs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingHardhat => "missing_hardhat",
            ViolationKind::MissingGloves => "missing_gloves",
            ViolationKind::MissingShoes => "missing_shoes",
            ViolationKind::MissingFacemask => "missing_facemask",
            ViolationKind::MissingEarmuffs => "missing_earmuffs",
            ViolationKind::ImproperlyWornGloves => "improperly_worn_gloves",
            ViolationKind::ImproperlyWornShoes => "improperly_worn_shoes",
            ViolationKind::ImproperlyWornFacemask => "improperly_worn_facemask",
            ViolationKind::ImproperlyWornEarmuffs => "improperly_worn_earmuffs",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One body-part/equipment pairing and what it reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComplianceRule {
    pub part: BodyPart,
    pub equipment: Equipment,
    /// Reported when the part and the equipment are both present.
    /// `None` means that combination is compliant.
    pub when_both: Option<ViolationKind>,
    /// Reported when the part is present without the equipment.
    pub when_missing: ViolationKind,
}

impl ComplianceRule {
    /// Outcome for one person. An absent body part is never checked.
    pub fn evaluate(&self, has_part: bool, has_equipment: bool) -> Option<ViolationKind> {
        match (has_part, has_equipment) {
            (false, _) => None,
            (true, true) => self.when_both,
            (true, false) => Some(self.when_missing),
        }
    }
}

/// Evaluation order is output order.
pub const RULES: [ComplianceRule; 5] = [
    ComplianceRule {
        part: BodyPart::Hand,
        equipment: Equipment::Gloves,
        when_both: Some(ViolationKind::ImproperlyWornGloves),
        when_missing: ViolationKind::MissingGloves,
    },
    ComplianceRule {
        part: BodyPart::Foot,
        equipment: Equipment::Shoes,
        when_both: Some(ViolationKind::ImproperlyWornShoes),
        when_missing: ViolationKind::MissingShoes,
    },
    ComplianceRule {
        part: BodyPart::Ear,
        equipment: Equipment::Earmuffs,
        when_both: Some(ViolationKind::ImproperlyWornEarmuffs),
        when_missing: ViolationKind::MissingEarmuffs,
    },
    ComplianceRule {
        part: BodyPart::Face,
        equipment: Equipment::Facemask,
        when_both: Some(ViolationKind::ImproperlyWornFacemask),
        when_missing: ViolationKind::MissingFacemask,
    },
    ComplianceRule {
        part: BodyPart::Head,
        equipment: Equipment::Hardhat,
        when_both: None,
        when_missing: ViolationKind::MissingHardhat,
    },
];

/// Violations for one person, in [`RULES`] order.
pub fn check_compliance(assignment: &PersonAssignment) -> Vec<ViolationKind> {
    RULES
        .iter()
        .filter_map(|rule| {
            rule.evaluate(
                assignment.has_part(rule.part),
                assignment.has_equipment(rule.equipment),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Assigned, BoundingBox, PersonId};

    fn assignment(parts: &[BodyPart], equipment: &[Equipment]) -> PersonAssignment {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        PersonAssignment {
            index: 0,
            person_id: PersonId::new("001"),
            bbox,
            confidence: 0.9,
            parts: parts
                .iter()
                .map(|&label| Assigned {
                    label,
                    bbox,
                    confidence: 0.5,
                })
                .collect(),
            equipment: equipment
                .iter()
                .map(|&label| Assigned {
                    label,
                    bbox,
                    confidence: 0.5,
                })
                .collect(),
        }
    }

    #[test]
    fn every_rule_matches_its_table_row() {
        let expected = [
            (
                Some(ViolationKind::ImproperlyWornGloves),
                Some(ViolationKind::MissingGloves),
            ),
            (
                Some(ViolationKind::ImproperlyWornShoes),
                Some(ViolationKind::MissingShoes),
            ),
            (
                Some(ViolationKind::ImproperlyWornEarmuffs),
                Some(ViolationKind::MissingEarmuffs),
            ),
            (
                Some(ViolationKind::ImproperlyWornFacemask),
                Some(ViolationKind::MissingFacemask),
            ),
            (None, Some(ViolationKind::MissingHardhat)),
        ];

        for (rule, (both, part_only)) in RULES.iter().zip(expected) {
            let cases = [
                (true, true, both),
                (true, false, part_only),
                (false, true, None),
                (false, false, None),
            ];
            for (has_part, has_equipment, want) in cases {
                let parts: Vec<BodyPart> = has_part.then_some(rule.part).into_iter().collect();
                let items: Vec<Equipment> =
                    has_equipment.then_some(rule.equipment).into_iter().collect();
                let got = check_compliance(&assignment(&parts, &items));
                assert_eq!(
                    got,
                    want.into_iter().collect::<Vec<_>>(),
                    "{} present={} / {} present={}",
                    rule.part,
                    has_part,
                    rule.equipment,
                    has_equipment
                );
            }
        }
    }

    #[test]
    fn hand_without_gloves_is_missing_gloves() {
        let got = check_compliance(&assignment(&[BodyPart::Hand], &[]));
        assert_eq!(got, vec![ViolationKind::MissingGloves]);
    }

    #[test]
    fn head_with_hardhat_is_compliant() {
        let got = check_compliance(&assignment(&[BodyPart::Head], &[Equipment::Hardhat]));
        assert!(got.is_empty());
    }

    #[test]
    fn violations_follow_rule_order() {
        let got = check_compliance(&assignment(
            &[BodyPart::Head, BodyPart::Face, BodyPart::Ear, BodyPart::Foot, BodyPart::Hand],
            &[Equipment::Facemask],
        ));
        assert_eq!(
            got,
            vec![
                ViolationKind::MissingGloves,
                ViolationKind::MissingShoes,
                ViolationKind::MissingEarmuffs,
                ViolationKind::ImproperlyWornFacemask,
                ViolationKind::MissingHardhat,
            ]
        );
    }

    #[test]
    fn duplicate_labels_do_not_change_outcome() {
        let once = check_compliance(&assignment(&[BodyPart::Hand], &[Equipment::Gloves]));
        let twice = check_compliance(&assignment(
            &[BodyPart::Hand, BodyPart::Hand],
            &[Equipment::Gloves, Equipment::Gloves],
        ));
        assert_eq!(once, twice);
    }

    #[test]
    fn unrelated_equipment_never_triggers() {
        let got = check_compliance(&assignment(
            &[],
            &[Equipment::Glasses, Equipment::Safetyvest, Equipment::Hardhat],
        ));
        assert!(got.is_empty());
    }

    #[test]
    fn violation_labels_serialize_snake_case() {
        for kind in ViolationKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }
}
