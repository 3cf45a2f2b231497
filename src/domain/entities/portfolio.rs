//! Simple dashboard-edited attribute records: skills, achievements, and
//! the named statistics counters shown on the public site.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::{blog_post::new_validation_error, option_fields::OptionField};

// ───── Skills ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub proficiency: i32,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewSkillRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(length(min = 1, max = 50))]
    pub category: String,

    #[validate(range(min = 0, max = 100))]
    pub proficiency: i32,

    #[validate(length(max = 100))]
    pub icon: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateSkillRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: OptionField<String>,

    #[validate(length(min = 1, max = 50))]
    pub category: OptionField<String>,

    #[validate(custom(function = "validate_optional_proficiency"))]
    pub proficiency: OptionField<i32>,

    #[validate(length(max = 100))]
    pub icon: OptionField<String>,

    pub sort_order: OptionField<i32>,
}

fn validate_optional_proficiency(value: &OptionField<i32>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(p) = value {
        if !(0..=100).contains(p) {
            return Err(new_validation_error("proficiency_range", "Proficiency must be between 0 and 100"));
        }
    }
    Ok(())
}

// ───── Achievements ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Achievement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub achieved_on: NaiveDate,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAchievementRequest {
    #[validate(length(min = 2, max = 200))]
    pub title: String,

    #[validate(length(min = 2, max = 2000))]
    pub description: String,

    pub achieved_on: NaiveDate,

    #[validate(length(max = 100))]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateAchievementRequest {
    #[validate(length(min = 2, max = 200))]
    pub title: OptionField<String>,

    #[validate(length(min = 2, max = 2000))]
    pub description: OptionField<String>,

    pub achieved_on: OptionField<NaiveDate>,

    #[validate(length(max = 100))]
    pub icon: OptionField<String>,
}

// ───── Stats counters ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatCounter {
    pub id: Uuid,
    pub key: String,
    pub label: String,
    pub value: i64,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertStatCounterRequest {
    #[validate(length(min = 1, max = 50), custom(function = "validate_counter_key"))]
    pub key: String,

    #[validate(length(min = 1, max = 100))]
    pub label: String,

    pub value: i64,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

fn validate_counter_key(key: &str) -> Result<(), ValidationError> {
    if !key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return Err(new_validation_error("counter_key", "Key must be lowercase snake_case"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proficiency_is_bounded() {
        let request = NewSkillRequest {
            name: "Rust".into(),
            category: "languages".into(),
            proficiency: 120,
            icon: None,
            sort_order: 0,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn counter_key_must_be_snake_case() {
        let request = UpsertStatCounterRequest {
            key: "Years Coding".into(),
            label: "Years coding".into(),
            value: 6,
            description: None,
        };
        assert!(request.validate().is_err());
    }
}
