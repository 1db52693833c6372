//! Integrated socioeducational questionnaire, answered by the student.
//!
//! Five nested sections. A submission counts as completed when the general
//! data is sworn and filled, the guardian is named, and at least one
//! contact phone is given.

use serde_json::{json, Map, Value};

use super::{object, FieldRef, IntakeKind, IntakeSchema};

pub const STORAGE_KEY: &str = "socioeducational_questionnaire_progress";

pub const SECTION_GENERAL: &str = "general";
pub const SECTION_FAMILY: &str = "family";
pub const SECTION_ECONOMY: &str = "economy";
pub const SECTION_STUDENT: &str = "student";
pub const SECTION_COMMUNITY: &str = "community";

const STEP_LABELS: &[&str] = &["General Data", "Family", "Economy", "Student", "Community"];

const GENERAL_REQUIRED: &[FieldRef] = &[
    FieldRef::new(SECTION_GENERAL, "truthfulness_pledge"),
    FieldRef::new(SECTION_GENERAL, "paternal_surname"),
    FieldRef::new(SECTION_GENERAL, "maternal_surname"),
    FieldRef::new(SECTION_GENERAL, "given_name"),
    FieldRef::new(SECTION_GENERAL, "grade_group"),
    FieldRef::new(SECTION_GENERAL, "email"),
];

const FAMILY_REQUIRED: &[FieldRef] = &[
    FieldRef::new(SECTION_FAMILY, "guardian_name"),
    FieldRef::new(SECTION_FAMILY, "guardian_relationship"),
];

const CONTACT_PHONES: &[FieldRef] = &[
    FieldRef::new(SECTION_FAMILY, "father_phone"),
    FieldRef::new(SECTION_FAMILY, "mother_phone"),
    FieldRef::new(SECTION_FAMILY, "guardian_phone"),
    FieldRef::new(SECTION_FAMILY, "emergency_phone"),
];

pub struct Socioeducational;

impl IntakeSchema for Socioeducational {
    fn kind(&self) -> IntakeKind {
        IntakeKind::Socioeducational
    }

    fn storage_key(&self) -> &'static str {
        STORAGE_KEY
    }

    fn step_labels(&self) -> &'static [&'static str] {
        STEP_LABELS
    }

    fn defaults(&self) -> Map<String, Value> {
        object(json!({
            SECTION_GENERAL: {
                "truthfulness_pledge": false,
                "paternal_surname": "",
                "maternal_surname": "",
                "given_name": "",
                "curp": "",
                "grade_group": "",
                "email": ""
            },
            SECTION_FAMILY: {
                "guardian_name": "",
                "guardian_relationship": "",
                "father_phone": "",
                "mother_phone": "",
                "guardian_phone": "",
                "emergency_phone": "",
                "family_type": "Nuclear",
                "mother_education": "Secundaria",
                "father_education": "Secundaria",
                "mother_occupation": "Actividades del hogar",
                "father_occupation": "Obrero",
                "social_security": "IMSS",
                "siblings": "Ninguno",
                "family_argument_frequency": "Nunca",
                "sexist_practices": "No"
            },
            SECTION_ECONOMY: {
                "housing_type": "Propia",
                "household_size": "4 a 6",
                "services": {
                    "drinking_water": true,
                    "electricity": true,
                    "drainage": true,
                    "landline": false,
                    "internet": false,
                    "cable_tv": false,
                    "air_conditioning": false
                },
                "car": "No",
                "monthly_expenses": "De 5 mil a 10 mil pesos",
                "household_earners": "2",
                "receives_scholarship": "No"
            },
            SECTION_STUDENT: {
                "situation": "Solo estudia",
                "preferred_subjects": [],
                "preferred_activities": [],
                "has_health_condition": "No"
            },
            SECTION_COMMUNITY: {
                "main_problem": "Contaminación",
                "second_problem": "Violencia",
                "third_problem": "Robos o asaltos",
                "missing_services": [],
                "alcohol_tobacco_on_block": "No",
                "alcohol_tobacco_at_home": "No",
                "drugs_on_block": "No",
                "drugs_at_home": "No",
                "fights_on_block": "Nunca",
                "recreation_spaces": "Sí",
                "community_traditions": "Sí",
                "sexist_practices": "No",
                "homophobic_practices": "No",
                "racist_practices": "No",
                "classist_practices": "No"
            }
        }))
    }

    fn required_fields(&self, step: u8) -> &'static [FieldRef] {
        match step {
            1 => GENERAL_REQUIRED,
            2 => FAMILY_REQUIRED,
            _ => &[],
        }
    }

    fn completion_rule(&self, sections: &Map<String, Value>) -> Option<bool> {
        let general = GENERAL_REQUIRED.iter().all(|f| f.is_answered(sections));
        let family = FAMILY_REQUIRED.iter().all(|f| f.is_answered(sections));
        let contact = CONTACT_PHONES.iter().any(|f| f.is_answered(sections));
        Some(general && family && contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered() -> Map<String, Value> {
        let mut sections = Socioeducational.defaults();
        sections[SECTION_GENERAL] = json!({
            "truthfulness_pledge": true,
            "paternal_surname": "García",
            "maternal_surname": "Soto",
            "given_name": "Valeria",
            "curp": "",
            "grade_group": "3B",
            "email": "valeria@example.mx"
        });
        sections[SECTION_FAMILY]["guardian_name"] = json!("Rosa Soto");
        sections[SECTION_FAMILY]["guardian_relationship"] = json!("Madre");
        sections[SECTION_FAMILY]["mother_phone"] = json!("5512345678");
        sections
    }

    #[test]
    fn defaults_are_not_complete() {
        assert_eq!(Socioeducational.completion_rule(&Socioeducational.defaults()), Some(false));
    }

    #[test]
    fn fully_answered_is_complete() {
        assert_eq!(Socioeducational.completion_rule(&answered()), Some(true));
    }

    #[test]
    fn pledge_is_required() {
        let mut sections = answered();
        sections[SECTION_GENERAL]["truthfulness_pledge"] = json!(false);
        assert_eq!(Socioeducational.completion_rule(&sections), Some(false));
    }

    #[test]
    fn whitespace_only_name_does_not_count() {
        let mut sections = answered();
        sections[SECTION_GENERAL]["given_name"] = json!("   ");
        assert_eq!(Socioeducational.completion_rule(&sections), Some(false));
    }

    #[test]
    fn any_single_phone_is_enough() {
        for phone in CONTACT_PHONES {
            let mut sections = answered();
            sections[SECTION_FAMILY]["mother_phone"] = json!("");
            sections[phone.section][phone.field] = json!("5598765432");
            assert_eq!(Socioeducational.completion_rule(&sections), Some(true));
        }
    }

    #[test]
    fn no_phone_is_incomplete() {
        let mut sections = answered();
        sections[SECTION_FAMILY]["mother_phone"] = json!(" ");
        assert_eq!(Socioeducational.completion_rule(&sections), Some(false));
    }

    #[test]
    fn curp_is_optional() {
        let sections = answered();
        assert_eq!(sections[SECTION_GENERAL]["curp"], "");
        assert_eq!(Socioeducational.completion_rule(&sections), Some(true));
    }
}
