//! Option decoding for choice controls.
//!
//! Option storage has gone through two encodings: a JSON string array
//! (current form builder) and a plain comma-separated string (legacy forms).
//! Both must decode without error; a string matching neither is a single
//! option.

/// Decodes a stored option string into the list of choices.
///
/// Resolution order: JSON string array, then comma-split with trimmed
/// segments (empties dropped), then the whole string as one option.
/// `None` or blank input yields an empty list.
pub fn normalize_options(raw: Option<&str>) -> Vec<String> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return Vec::new(),
    };

    if let Ok(parsed) = serde_json::from_str::<Vec<String>>(raw) {
        return parsed;
    }

    if raw.contains(',') {
        return raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    vec![raw.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array_encoding() {
        assert_eq!(
            normalize_options(Some(r#"["A","B"]"#)),
            vec!["A".to_string(), "B".to_string()]
        );
    }

    #[test]
    fn test_comma_separated_encoding() {
        assert_eq!(
            normalize_options(Some("A,B,C")),
            vec!["A".to_string(), "B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_comma_separated_trims_and_drops_empties() {
        assert_eq!(
            normalize_options(Some(" A , ,B ,")),
            vec!["A".to_string(), "B".to_string()]
        );
    }

    #[test]
    fn test_single_option() {
        assert_eq!(normalize_options(Some("single")), vec!["single".to_string()]);
    }

    #[test]
    fn test_none_and_blank_yield_empty() {
        assert_eq!(normalize_options(None), Vec::<String>::new());
        assert_eq!(normalize_options(Some("")), Vec::<String>::new());
        assert_eq!(normalize_options(Some("   ")), Vec::<String>::new());
    }

    #[test]
    fn test_malformed_json_falls_back_to_comma_split() {
        // Looks like JSON but isn't valid — commas still win.
        assert_eq!(
            normalize_options(Some(r#"["A","B"#)),
            vec![r#"["A""#.to_string(), r#""B"#.to_string()]
        );
    }
}
