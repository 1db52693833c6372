//! Student profile intake: administrative data, support network and the
//! socioeconomic battery, filled in by a teacher over five steps.

use serde_json::{json, Map, Value};

use super::{object, FieldRef, IntakeKind, IntakeSchema};

pub const STORAGE_KEY: &str = "student_profile_progress";

pub const SECTION_ADMINISTRATIVE: &str = "administrative";
pub const SECTION_SUPPORT_NETWORK: &str = "support_network";
pub const SECTION_SOCIOECONOMIC: &str = "socioeconomic";

const STEP_LABELS: &[&str] = &[
    "Administrative Data",
    "Support Network",
    "Family & Socioeconomic",
    "Housing & Health",
    "Community & Interests",
];

const STEP_1_REQUIRED: &[FieldRef] = &[
    FieldRef::new(SECTION_ADMINISTRATIVE, "curp"),
    FieldRef::new(SECTION_ADMINISTRATIVE, "given_name"),
    FieldRef::new(SECTION_ADMINISTRATIVE, "paternal_surname"),
];

const STEP_2_REQUIRED: &[FieldRef] = &[
    FieldRef::new(SECTION_SUPPORT_NETWORK, "guardian_name"),
    FieldRef::new(SECTION_SUPPORT_NETWORK, "relationship"),
];

const STEP_3_REQUIRED: &[FieldRef] = &[
    FieldRef::new(SECTION_SOCIOECONOMIC, "family_type"),
    FieldRef::new(SECTION_SOCIOECONOMIC, "monthly_income"),
];

const STEP_4_REQUIRED: &[FieldRef] = &[
    FieldRef::new(SECTION_SOCIOECONOMIC, "housing_type"),
    FieldRef::new(SECTION_SOCIOECONOMIC, "health_institution"),
];

pub struct StudentProfile;

impl IntakeSchema for StudentProfile {
    fn kind(&self) -> IntakeKind {
        IntakeKind::StudentProfile
    }

    fn storage_key(&self) -> &'static str {
        STORAGE_KEY
    }

    fn step_labels(&self) -> &'static [&'static str] {
        STEP_LABELS
    }

    fn defaults(&self) -> Map<String, Value> {
        object(json!({
            SECTION_ADMINISTRATIVE: {
                "curp": "",
                "given_name": "",
                "paternal_surname": "",
                "maternal_surname": "",
                "gender": "Prefiero no decir",
                "middle_school_average": 8.0,
                "middle_school_type": "General",
                "funding": "Público"
            },
            SECTION_SUPPORT_NETWORK: {
                "guardian_name": "",
                "relationship": "Padre",
                "father_phone": "",
                "mother_phone": "",
                "guardian_phone": "",
                "emergency_phone": ""
            },
            SECTION_SOCIOECONOMIC: {
                "family_type": "Nuclear",
                "father_education": "Secundaria",
                "mother_education": "Secundaria",
                "father_occupation": "Obrero",
                "mother_occupation": "Hogar",
                "employment_status": "Solo estudia",
                "housing_type": "Propia",
                "housing_services": {
                    "water": true,
                    "electricity": true,
                    "drainage": true,
                    "internet": false,
                    "cable_tv": false,
                    "air_conditioning": false
                },
                "monthly_income": "5001-10000",
                "income_earners": 2,
                "has_scholarship": false,
                "health_institution": "IMSS",
                "chronic_conditions": [],
                "community_problems": [],
                "missing_services": [],
                "substance_use_on_block": [],
                "substance_use_at_home": [],
                "community_argument_frequency": "Rara vez",
                "community_fight_intensity": "Ninguna",
                "family_argument_frequency": "Rara vez",
                "family_fight_intensity": "Ninguna",
                "local_traditions": [],
                "discriminatory_practices": [],
                "preferred_subjects": [],
                "interests": []
            }
        }))
    }

    fn required_fields(&self, step: u8) -> &'static [FieldRef] {
        match step {
            1 => STEP_1_REQUIRED,
            2 => STEP_2_REQUIRED,
            3 => STEP_3_REQUIRED,
            4 => STEP_4_REQUIRED,
            _ => &[],
        }
    }

    fn completion_rule(&self, _sections: &Map<String, Value>) -> Option<bool> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_three_sections() {
        let defaults = StudentProfile.defaults();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults[SECTION_ADMINISTRATIVE]["middle_school_average"], 8.0);
        assert_eq!(
            defaults[SECTION_SOCIOECONOMIC]["housing_services"]["water"],
            true
        );
    }

    #[test]
    fn first_step_requires_identifying_fields() {
        let defaults = StudentProfile.defaults();
        assert!(STEP_1_REQUIRED.iter().all(|f| !f.is_answered(&defaults)));
    }

    #[test]
    fn last_step_has_no_requirements() {
        assert!(StudentProfile.required_fields(5).is_empty());
    }

    #[test]
    fn has_no_completion_rule() {
        assert_eq!(StudentProfile.completion_rule(&StudentProfile.defaults()), None);
    }
}
