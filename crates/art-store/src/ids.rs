//! Collection id generation and validation

use chrono::{DateTime, Local};

/// Keep alphanumerics, spaces and underscores, replace everything else with
/// `_`, trim, then turn spaces into underscores.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == ' ' || c == '_' { c } else { '_' })
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

/// `<sanitized name>_<YYYYmmdd_HHMMSS>`
pub fn collection_id_base(name: &str, now: DateTime<Local>) -> String {
    format!("{}_{}", sanitize_name(name), now.format("%Y%m%d_%H%M%S"))
}

/// Candidate id for the `attempt`-th try; the first attempt has no suffix.
pub fn with_suffix(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}_{}", base, attempt + 1)
    }
}

/// Ids map directly to directory names, so anything that could escape the
/// collections root is rejected.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && !id.contains("..")
        && !id.contains('/')
        && !id.contains('\\')
        && !id.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("My Ocean Series"), "My_Ocean_Series");
        assert_eq!(sanitize_name("  Cities: v2!  "), "Cities__v2_");
        assert_eq!(sanitize_name("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_name("snake_case ok"), "snake_case_ok");
    }

    #[test]
    fn test_collection_id_base_format() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            collection_id_base("Deep Sea", now),
            "Deep_Sea_20240309_140507"
        );
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix("x_20240101_000000", 0), "x_20240101_000000");
        assert_eq!(with_suffix("x_20240101_000000", 1), "x_20240101_000000_2");
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("Deep_Sea_20240309_140507"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("."));
        assert!(!is_valid_id(".."));
        assert!(!is_valid_id("../etc"));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("a\\b"));
    }
}
