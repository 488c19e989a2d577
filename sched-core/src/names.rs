//! Project name sanitization.
//!
//! Names come straight from URLs typed by browser clients and become file
//! names on a shared drive, so only the truly dangerous filesystem
//! characters are stripped. Everything else (Korean, spaces, dots) is kept.

/// Characters that are invalid in file names on Windows and NTFS shares.
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Fallback for names that sanitize down to nothing.
pub const FALLBACK_NAME: &str = "untitled";

/// Strip forbidden filesystem characters and surrounding whitespace.
///
/// An empty or all-forbidden input maps to [`FALLBACK_NAME`], so the result
/// is always a usable file stem. Idempotent.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_forbidden_characters() {
        assert_eq!(sanitize_name("a<b>c:d\"e/f\\g|h?i*j"), "abcdefghij");
    }

    #[test]
    fn preserves_unicode_and_spaces() {
        assert_eq!(sanitize_name("주간 일정 2024"), "주간 일정 2024");
        assert_eq!(sanitize_name("Team A"), "Team A");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(sanitize_name("  padded  "), "padded");
    }

    #[test]
    fn empty_and_all_forbidden_fall_back() {
        assert_eq!(sanitize_name(""), FALLBACK_NAME);
        assert_eq!(sanitize_name("   "), FALLBACK_NAME);
        assert_eq!(sanitize_name("???***"), FALLBACK_NAME);
    }

    #[test]
    fn idempotent() {
        for input in ["Team A", "a/b\\c", "", "  주간  ", "<>:\"|?*"] {
            let once = sanitize_name(input);
            assert_eq!(sanitize_name(&once), once, "input {:?}", input);
        }
    }
}
