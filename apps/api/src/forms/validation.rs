//! Per-step validation, run on step advance and on final submit.
//!
//! Fail-fast: the first violation in field order is reported and nothing
//! else is inspected. Violations are state the caller renders, never
//! panics or exceptions.

use std::collections::HashMap;

use crate::forms::schema::{FieldValue, FormField};

/// First violation found in a step, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepViolation {
    /// A required field is unset, whitespace-only, or an empty array.
    MissingRequired { label: String },
    /// A skills field has selections whose rating is still unset.
    UnratedSkills { label: String },
}

impl StepViolation {
    pub fn message(&self) -> String {
        match self {
            StepViolation::MissingRequired { label } => format!("{label} is required"),
            StepViolation::UnratedSkills { label } => {
                format!("{label} has selected skills without a rating")
            }
        }
    }
}

/// Validates one step against the session's values.
///
/// Required fields must carry a non-empty value. Independently of the
/// required flag, a skills selection blocks while any chosen skill's
/// rating is unset — a picked skill with no rating is incomplete, not
/// absent.
pub fn validate_step(
    step: &[FormField],
    values: &HashMap<String, FieldValue>,
) -> Option<StepViolation> {
    for field in step {
        if field.field_type.is_page_break() {
            continue;
        }

        let value = values.get(&field.identifier());

        if let Some(FieldValue::Skills(selections)) = value {
            if !selections.is_empty()
                && selections.iter().any(|s| s.effective_rating().is_none())
            {
                return Some(StepViolation::UnratedSkills {
                    label: field.label.clone(),
                });
            }
        }

        if field.is_required && value.map_or(true, FieldValue::is_empty) {
            return Some(StepViolation::MissingRequired {
                label: field.label.clone(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::{FieldType, FileRef, SkillSelection};
    use uuid::Uuid;

    fn make_field(name: &str, label: &str, field_type: FieldType, required: bool) -> FormField {
        FormField {
            id: Uuid::new_v4(),
            field_name: Some(name.to_string()),
            field_type,
            label: label.to_string(),
            placeholder: None,
            options: None,
            is_required: required,
            order: 0,
            field_width: None,
        }
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_all_filled_passes() {
        let step = vec![make_field("a", "A", FieldType::Text, true)];
        let mut values = HashMap::new();
        values.insert("a".to_string(), text("x"));
        assert_eq!(validate_step(&step, &values), None);
    }

    #[test]
    fn test_fail_fast_reports_first_missing_in_order() {
        let step = vec![
            make_field("a", "A", FieldType::Text, true),
            make_field("b", "B", FieldType::Text, true),
            make_field("c", "C", FieldType::Text, true),
        ];
        let mut values = HashMap::new();
        values.insert("a".to_string(), text("filled"));
        values.insert("c".to_string(), text("filled"));
        assert_eq!(
            validate_step(&step, &values),
            Some(StepViolation::MissingRequired {
                label: "B".to_string()
            })
        );
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let step = vec![make_field("a", "A", FieldType::Text, true)];
        let mut values = HashMap::new();
        values.insert("a".to_string(), text("   "));
        assert!(validate_step(&step, &values).is_some());
    }

    #[test]
    fn test_empty_array_counts_as_empty() {
        let step = vec![make_field("langs", "Languages", FieldType::Checkbox, true)];
        let mut values = HashMap::new();
        values.insert("langs".to_string(), FieldValue::Many(vec![]));
        assert!(validate_step(&step, &values).is_some());
    }

    #[test]
    fn test_optional_empty_field_passes() {
        let step = vec![make_field("a", "A", FieldType::Text, false)];
        assert_eq!(validate_step(&step, &HashMap::new()), None);
    }

    #[test]
    fn test_file_value_satisfies_required() {
        let step = vec![make_field("cv", "Resume", FieldType::File, true)];
        let mut values = HashMap::new();
        values.insert(
            "cv".to_string(),
            FieldValue::File(FileRef {
                file_name: "abc.pdf".to_string(),
                original_name: "cv.pdf".to_string(),
                path: "uploads/abc.pdf".to_string(),
            }),
        );
        assert_eq!(validate_step(&step, &values), None);
    }

    #[test]
    fn test_unrated_skill_blocks() {
        let step = vec![make_field("skills", "Skills", FieldType::Skills, true)];
        let mut values = HashMap::new();
        values.insert(
            "skills".to_string(),
            FieldValue::Skills(vec![
                SkillSelection {
                    name: "Go".to_string(),
                    rating: Some(3),
                },
                SkillSelection {
                    name: "Rust".to_string(),
                    rating: Some(0), // out of range, treated as unset
                },
            ]),
        );
        assert_eq!(
            validate_step(&step, &values),
            Some(StepViolation::UnratedSkills {
                label: "Skills".to_string()
            })
        );
    }

    #[test]
    fn test_rating_every_skill_unblocks() {
        let step = vec![make_field("skills", "Skills", FieldType::Skills, true)];
        let mut values = HashMap::new();
        values.insert(
            "skills".to_string(),
            FieldValue::Skills(vec![
                SkillSelection {
                    name: "Go".to_string(),
                    rating: Some(3),
                },
                SkillSelection {
                    name: "Rust".to_string(),
                    rating: Some(5),
                },
            ]),
        );
        assert_eq!(validate_step(&step, &values), None);
    }

    #[test]
    fn test_unrated_skill_blocks_even_when_optional() {
        let step = vec![make_field("skills", "Skills", FieldType::Skills, false)];
        let mut values = HashMap::new();
        values.insert(
            "skills".to_string(),
            FieldValue::Skills(vec![SkillSelection {
                name: "Rust".to_string(),
                rating: None,
            }]),
        );
        assert!(validate_step(&step, &values).is_some());
    }

    #[test]
    fn test_empty_required_skills_reports_missing_not_unrated() {
        let step = vec![make_field("skills", "Skills", FieldType::Skills, true)];
        let mut values = HashMap::new();
        values.insert("skills".to_string(), FieldValue::Skills(vec![]));
        assert_eq!(
            validate_step(&step, &values),
            Some(StepViolation::MissingRequired {
                label: "Skills".to_string()
            })
        );
    }
}
