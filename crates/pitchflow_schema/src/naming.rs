//! Column name sanitization.
//!
//! Warehouse identifiers must match `^[A-Za-z_][A-Za-z0-9_]*$` and be at most
//! 128 characters long.

/// Maximum length of a warehouse column name.
pub const MAX_COLUMN_NAME_LEN: usize = 128;

/// Turn an arbitrary CSV header into a valid warehouse column name.
///
/// Non-alphanumeric characters become `_`, runs of `_` collapse to one and
/// leading/trailing underscores are dropped. A name that would start with a
/// digit keeps a single leading `_`.
///
/// Distinct headers can map to the same name (`"A-B"` and `"A_B"`); callers
/// that need unique names must check for themselves. Headers made only of
/// symbols produce an empty string.
pub fn sanitize_column_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    let collapsed = replaced
        .split('_')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let mut sanitized = if collapsed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", collapsed)
    } else {
        collapsed
    };

    // ASCII only at this point, so byte truncation is char truncation.
    sanitized.truncate(MAX_COLUMN_NAME_LEN);
    while sanitized.len() > 1 && sanitized.ends_with('_') {
        sanitized.pop();
    }
    sanitized
}

/// Returns true if the name is already a valid warehouse column name.
pub fn is_valid_column_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= MAX_COLUMN_NAME_LEN
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_and_collapses() {
        assert_eq!(sanitize_column_name("Team Name!"), "Team_Name");
        assert_eq!(sanitize_column_name("Goals (Home)"), "Goals_Home");
        assert_eq!(sanitize_column_name("a  --  b"), "a_b");
        assert_eq!(sanitize_column_name("__private__"), "private");
    }

    #[test]
    fn test_sanitize_preserves_valid_names() {
        assert_eq!(sanitize_column_name("goals_for"), "goals_for");
        assert_eq!(sanitize_column_name("matchId"), "matchId");
    }

    #[test]
    fn test_sanitize_leading_digit_gets_underscore() {
        assert_eq!(sanitize_column_name("1st Half"), "_1st_Half");
        assert_eq!(sanitize_column_name("_2nd"), "_2nd");
        assert_eq!(sanitize_column_name("2024"), "_2024");
    }

    #[test]
    fn test_sanitize_non_ascii_is_replaced() {
        assert_eq!(sanitize_column_name("București"), "Bucure_ti");
        assert_eq!(sanitize_column_name("Ø goals"), "goals");
    }

    #[test]
    fn test_sanitize_degenerate_input() {
        assert_eq!(sanitize_column_name(""), "");
        assert_eq!(sanitize_column_name("!!!"), "");
        assert_eq!(sanitize_column_name("___"), "");
    }

    #[test]
    fn test_sanitize_collisions_are_not_resolved() {
        assert_eq!(sanitize_column_name("A-B"), sanitize_column_name("A_B"));
    }

    #[test]
    fn test_sanitize_truncates_to_max_len() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_column_name(&long).len(), MAX_COLUMN_NAME_LEN);

        // Cut lands right after a separator: no dangling underscore.
        let name = format!("{}_{}", "a".repeat(127), "b".repeat(10));
        let sanitized = sanitize_column_name(&name);
        assert_eq!(sanitized, "a".repeat(127));
        assert_eq!(sanitize_column_name(&sanitized), sanitized);
    }

    #[test]
    fn test_is_valid_column_name() {
        assert!(is_valid_column_name("Team_Name"));
        assert!(is_valid_column_name("_1st"));
        assert!(!is_valid_column_name(""));
        assert!(!is_valid_column_name("1st"));
        assert!(!is_valid_column_name("Team Name"));
        assert!(!is_valid_column_name(&"x".repeat(129)));
    }
}
