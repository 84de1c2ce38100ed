//! Filesystem-safe filename stems derived from prompt text.

const MAX_LEN: usize = 60;
const FALLBACK: &str = "sound";

/// Derive a slug from arbitrary input.
///
/// Total over all strings: the result is 1 to 60 lower-case characters from
/// `[a-z0-9-]`, never starting or ending with `-`. Runs of anything else
/// collapse to a single `-`; input with no ASCII alphanumerics falls back
/// to `"sound"`.
pub fn slug(input: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        return FALLBACK.to_string();
    }

    // all output chars are ASCII, so byte truncation is safe
    out.truncate(MAX_LEN);
    while out.ends_with('-') {
        out.pop();
    }

    if out.is_empty() {
        FALLBACK.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt() {
        assert_eq!(slug("Laser Zap!!"), "laser-zap");
        assert_eq!(slug("coin pickup"), "coin-pickup");
    }

    #[test]
    fn test_no_alphanumerics_falls_back() {
        assert_eq!(slug("???"), "sound");
        assert_eq!(slug(""), "sound");
        assert_eq!(slug("   "), "sound");
        assert_eq!(slug("héllo"), "h-llo"); // non-ASCII letters are separators
    }

    #[test]
    fn test_runs_collapse_and_edges_trim() {
        assert_eq!(slug("  power--up!!  chime  "), "power-up-chime");
        assert_eq!(slug("!boom!"), "boom");
    }

    #[test]
    fn test_truncation_to_sixty() {
        let long: String = "a".repeat(200);
        let s = slug(&long);
        assert_eq!(s.len(), 60);

        // truncation must not leave a trailing separator
        let alternating = "ab ".repeat(40);
        let s = slug(&alternating);
        assert!(s.len() <= 60);
        assert!(!s.ends_with('-'));
        assert!(!s.starts_with('-'));
    }

    #[test]
    fn test_idempotent_and_total() {
        for input in ["Laser Zap!!", "???", "UPPER case", "zombie moan 3"] {
            let once = slug(input);
            assert_eq!(slug(&once), once);
            assert!(!once.is_empty() && once.len() <= 60);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}
