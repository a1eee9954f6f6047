//! Submission transformation — turns the session's identifier-keyed values
//! into the label-keyed payload the submission endpoint expects, and derives
//! the well-known candidate attributes from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::forms::schema::{FieldValue, FormField};

/// Identifier conventionally used by the form builder for the portfolio
/// links field; always remapped to the literal "Portfolio Links" label.
const PORTFOLIO_LINKS_IDENT: &str = "portfolio_links";
const PORTFOLIO_LINKS_LABEL: &str = "Portfolio Links";

/// Final submit artifact: label-keyed form data plus heuristically derived
/// candidate attributes.
///
/// The attribute heuristics are best-effort label/content matching and can
/// misclassify ambiguous data (a field labeled "Emergency Contact Name" is
/// read as the candidate's name when it is encountered first). That is a
/// known limitation of the current product behavior, kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledSubmission {
    pub form_data: Map<String, Value>,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
}

/// Builds the labeled submission from a value map and the form's fields.
///
/// Labels come from the identifier→label lookup; a value whose identifier
/// matches no field keeps its raw identifier as the key. Entries are
/// processed in field order (then leftover identifiers in sorted order) so
/// the first-match-wins attribute heuristics are deterministic.
pub fn to_labeled_submission(
    values: &HashMap<String, FieldValue>,
    fields: &[FormField],
) -> LabeledSubmission {
    let mut submission = LabeledSubmission {
        form_data: Map::new(),
        candidate_name: None,
        candidate_email: None,
        candidate_phone: None,
    };

    let mut seen: Vec<&str> = Vec::new();
    for field in fields {
        let identifier = field.identifier();
        if let Some((identifier, value)) = values.get_key_value(identifier.as_str()) {
            seen.push(identifier.as_str());
            let label = resolve_label(identifier, Some(field.label.as_str()));
            push_entry(&mut submission, &label, value);
        }
    }

    // Values keyed by identifiers no field claims: raw identifier as label.
    let mut leftovers: Vec<(&String, &FieldValue)> = values
        .iter()
        .filter(|(identifier, _)| !seen.contains(&identifier.as_str()))
        .collect();
    leftovers.sort_by(|a, b| a.0.cmp(b.0));
    for (identifier, value) in leftovers {
        let label = resolve_label(identifier, None);
        push_entry(&mut submission, &label, value);
    }

    submission
}

fn resolve_label(identifier: &str, field_label: Option<&str>) -> String {
    if identifier.eq_ignore_ascii_case(PORTFOLIO_LINKS_IDENT)
        || identifier.eq_ignore_ascii_case("portfolioLinks")
    {
        return PORTFOLIO_LINKS_LABEL.to_string();
    }
    match field_label {
        Some(label) => label.to_string(),
        None => identifier.to_string(),
    }
}

fn push_entry(submission: &mut LabeledSubmission, label: &str, value: &FieldValue) {
    if let FieldValue::Text(text) = value {
        derive_candidate_attributes(submission, label, text);
    }
    let json = serde_json::to_value(value).unwrap_or(Value::Null);
    submission.form_data.insert(label.to_string(), json);
}

/// Label/content matching per category; first match wins per category.
fn derive_candidate_attributes(submission: &mut LabeledSubmission, label: &str, text: &str) {
    let label_lower = label.to_lowercase();

    if submission.candidate_name.is_none() && label_lower.contains("name") {
        submission.candidate_name = Some(text.to_string());
    }
    if submission.candidate_email.is_none()
        && (label_lower.contains("email") || text.contains('@'))
    {
        submission.candidate_email = Some(text.to_string());
    }
    if submission.candidate_phone.is_none()
        && (label_lower.contains("phone")
            || label_lower.contains("mobile")
            || label_lower.contains("contact"))
    {
        submission.candidate_phone = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::{FieldType, FileRef, SkillSelection};
    use uuid::Uuid;

    fn make_field(name: &str, label: &str) -> FormField {
        FormField {
            id: Uuid::new_v4(),
            field_name: Some(name.to_string()),
            field_type: FieldType::Text,
            label: label.to_string(),
            placeholder: None,
            options: None,
            is_required: false,
            order: 0,
            field_width: None,
        }
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_labels_replace_identifiers() {
        let fields = vec![
            make_field("f1", "Full Name"),
            make_field("f2", "Email Address"),
        ];
        let mut values = HashMap::new();
        values.insert("f1".to_string(), text("Jane Doe"));
        values.insert("f2".to_string(), text("jane@x.com"));

        let submission = to_labeled_submission(&values, &fields);
        assert_eq!(
            submission.form_data.get("Full Name"),
            Some(&Value::String("Jane Doe".to_string()))
        );
        assert_eq!(
            submission.form_data.get("Email Address"),
            Some(&Value::String("jane@x.com".to_string()))
        );
        assert_eq!(submission.candidate_name.as_deref(), Some("Jane Doe"));
        assert_eq!(submission.candidate_email.as_deref(), Some("jane@x.com"));
    }

    #[test]
    fn test_unknown_identifier_kept_raw() {
        let mut values = HashMap::new();
        values.insert("mystery_key".to_string(), text("42"));
        let submission = to_labeled_submission(&values, &[]);
        assert_eq!(
            submission.form_data.get("mystery_key"),
            Some(&Value::String("42".to_string()))
        );
    }

    #[test]
    fn test_portfolio_links_identifier_always_remapped() {
        let fields = vec![make_field("portfolio_links", "Your links")];
        let mut values = HashMap::new();
        values.insert(
            "portfolio_links".to_string(),
            FieldValue::Many(vec!["https://example.dev".to_string()]),
        );
        let submission = to_labeled_submission(&values, &fields);
        assert!(submission.form_data.contains_key("Portfolio Links"));
        assert!(!submission.form_data.contains_key("Your links"));
    }

    #[test]
    fn test_email_detected_by_at_sign_without_email_label() {
        let fields = vec![make_field("f1", "How can we reach you?")];
        let mut values = HashMap::new();
        values.insert("f1".to_string(), text("jane@x.com"));
        let submission = to_labeled_submission(&values, &fields);
        assert_eq!(submission.candidate_email.as_deref(), Some("jane@x.com"));
    }

    #[test]
    fn test_phone_detected_by_mobile_label() {
        let fields = vec![make_field("f1", "Mobile Number")];
        let mut values = HashMap::new();
        values.insert("f1".to_string(), text("+31 6 12345678"));
        let submission = to_labeled_submission(&values, &fields);
        assert_eq!(
            submission.candidate_phone.as_deref(),
            Some("+31 6 12345678")
        );
    }

    #[test]
    fn test_first_match_wins_per_category() {
        let fields = vec![
            make_field("f1", "First Name"),
            make_field("f2", "Last Name"),
        ];
        let mut values = HashMap::new();
        values.insert("f1".to_string(), text("Jane"));
        values.insert("f2".to_string(), text("Doe"));
        let submission = to_labeled_submission(&values, &fields);
        assert_eq!(submission.candidate_name.as_deref(), Some("Jane"));
    }

    // Pins the documented limitation: an "Emergency Contact Name" field
    // encountered first is read as both the candidate's name and phone.
    #[test]
    fn test_ambiguous_label_misclassifies_as_documented() {
        let fields = vec![
            make_field("f1", "Emergency Contact Name"),
            make_field("f2", "Full Name"),
        ];
        let mut values = HashMap::new();
        values.insert("f1".to_string(), text("Bob Neighbor"));
        values.insert("f2".to_string(), text("Jane Doe"));
        let submission = to_labeled_submission(&values, &fields);
        assert_eq!(submission.candidate_name.as_deref(), Some("Bob Neighbor"));
        assert_eq!(submission.candidate_phone.as_deref(), Some("Bob Neighbor"));
    }

    #[test]
    fn test_file_value_serializes_as_reference_record() {
        let fields = vec![make_field("cv", "Resume")];
        let mut values = HashMap::new();
        values.insert(
            "cv".to_string(),
            FieldValue::File(FileRef {
                file_name: "abc.pdf".to_string(),
                original_name: "cv.pdf".to_string(),
                path: "uploads/abc.pdf".to_string(),
            }),
        );
        let submission = to_labeled_submission(&values, &fields);
        let entry = submission.form_data.get("Resume").unwrap();
        assert_eq!(entry["original_name"], "cv.pdf");
        assert_eq!(entry["path"], "uploads/abc.pdf");
    }

    #[test]
    fn test_skills_serialize_with_ratings() {
        let fields = vec![make_field("skills", "Skills")];
        let mut values = HashMap::new();
        values.insert(
            "skills".to_string(),
            FieldValue::Skills(vec![SkillSelection {
                name: "Rust".to_string(),
                rating: Some(5),
            }]),
        );
        let submission = to_labeled_submission(&values, &fields);
        let entry = submission.form_data.get("Skills").unwrap();
        assert_eq!(entry[0]["name"], "Rust");
        assert_eq!(entry[0]["rating"], 5);
    }
}
