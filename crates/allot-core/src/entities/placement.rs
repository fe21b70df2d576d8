use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Gender;

/// First-choice success rate of the students living in one neighborhood.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NeighborhoodSatisfaction {
    pub neighborhood: String,
    pub resident_count: u64,
    pub first_choice_success_count: u64,
    pub success_pct: f64,
}

/// First-choice applications to one school split by gender.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GenderPreference {
    pub school: String,
    pub male_applicants: u64,
    pub female_applicants: u64,
    /// `male_applicants - female_applicants`.
    pub gap: i64,
}

/// First-choice success rate of one gender.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GenderSatisfaction {
    pub gender: Gender,
    pub student_count: u64,
    pub first_choice_success_count: u64,
    pub success_pct: f64,
}

/// Gender make-up of the students actually assigned to one school.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SchoolGenderRatio {
    pub school: String,
    pub male_count: u64,
    pub female_count: u64,
    /// Share of male students among those with a recorded gender.
    pub male_pct: f64,
}
