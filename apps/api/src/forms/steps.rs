//! Step splitting — partitions an ordered field list at page-break markers.
//!
//! Steps are a pagination unit derived fresh on every use; they are never
//! persisted. Page breaks carry no value and never appear inside a step.

use crate::forms::schema::FormField;

/// Splits fields (assumed sorted by `order`) into steps at `PageBreak`
/// markers. Empty buckets are dropped, so leading, trailing, or consecutive
/// breaks never produce a zero-field step. A form with no non-break fields
/// yields an empty list; callers surface a "no fields configured" state.
///
/// Pure and total over any input list.
pub fn split_steps(fields: &[FormField]) -> Vec<Vec<FormField>> {
    let mut steps: Vec<Vec<FormField>> = Vec::new();
    let mut bucket: Vec<FormField> = Vec::new();

    for field in fields {
        if field.field_type.is_page_break() {
            if !bucket.is_empty() {
                steps.push(std::mem::take(&mut bucket));
            }
        } else {
            bucket.push(field.clone());
        }
    }

    if !bucket.is_empty() {
        steps.push(bucket);
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::FieldType;
    use uuid::Uuid;

    fn make_field(order: i32, field_type: FieldType, label: &str) -> FormField {
        FormField {
            id: Uuid::new_v4(),
            field_name: None,
            field_type,
            label: label.to_string(),
            placeholder: None,
            options: None,
            is_required: false,
            order,
            field_width: None,
        }
    }

    fn labels(steps: &[Vec<FormField>]) -> Vec<Vec<String>> {
        steps
            .iter()
            .map(|s| s.iter().map(|f| f.label.clone()).collect())
            .collect()
    }

    #[test]
    fn test_no_breaks_single_step() {
        let fields = vec![
            make_field(0, FieldType::Text, "a"),
            make_field(1, FieldType::Email, "b"),
        ];
        let steps = split_steps(&fields);
        assert_eq!(labels(&steps), vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_break_in_middle_splits_two_steps() {
        let fields = vec![
            make_field(0, FieldType::Text, "a"),
            make_field(1, FieldType::PageBreak, ""),
            make_field(2, FieldType::Email, "b"),
        ];
        let steps = split_steps(&fields);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0][0].label, "a");
        assert_eq!(steps[1][0].label, "b");
    }

    #[test]
    fn test_leading_and_trailing_breaks_dropped() {
        let fields = vec![
            make_field(0, FieldType::PageBreak, ""),
            make_field(1, FieldType::Text, "a"),
            make_field(2, FieldType::PageBreak, ""),
        ];
        let steps = split_steps(&fields);
        assert_eq!(labels(&steps), vec![vec!["a".to_string()]]);
    }

    #[test]
    fn test_consecutive_breaks_produce_no_empty_step() {
        let fields = vec![
            make_field(0, FieldType::Text, "a"),
            make_field(1, FieldType::PageBreak, ""),
            make_field(2, FieldType::PageBreak, ""),
            make_field(3, FieldType::Text, "b"),
        ];
        let steps = split_steps(&fields);
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn test_only_breaks_yield_empty_list() {
        let fields = vec![
            make_field(0, FieldType::PageBreak, ""),
            make_field(1, FieldType::PageBreak, ""),
        ];
        assert!(split_steps(&fields).is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_list() {
        assert!(split_steps(&[]).is_empty());
    }

    #[test]
    fn test_concatenation_preserves_order_and_content() {
        let fields = vec![
            make_field(0, FieldType::PageBreak, ""),
            make_field(1, FieldType::Text, "a"),
            make_field(2, FieldType::Email, "b"),
            make_field(3, FieldType::PageBreak, ""),
            make_field(4, FieldType::Select, "c"),
            make_field(5, FieldType::PageBreak, ""),
        ];
        let steps = split_steps(&fields);
        let flattened: Vec<String> = steps
            .iter()
            .flatten()
            .map(|f| f.label.clone())
            .collect();
        let non_breaks: Vec<String> = fields
            .iter()
            .filter(|f| !f.field_type.is_page_break())
            .map(|f| f.label.clone())
            .collect();
        assert_eq!(flattened, non_breaks);
    }

    #[test]
    fn test_resplit_is_identical() {
        let fields = vec![
            make_field(0, FieldType::Text, "a"),
            make_field(1, FieldType::PageBreak, ""),
            make_field(2, FieldType::Email, "b"),
        ];
        assert_eq!(labels(&split_steps(&fields)), labels(&split_steps(&fields)));
    }
}
