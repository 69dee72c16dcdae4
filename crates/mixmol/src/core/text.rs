//! Shared text utilities for labels
//!
//! Labels are measured in terminal display columns, not bytes or chars.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a label in terminal columns
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cut a label down to at most `max_width` columns, ending in `…` when cut
///
/// # Example
/// ```
/// use mixmol::core::truncate_label;
///
/// assert_eq!(truncate_label("angostura bitters", 9), "angostur…");
/// assert_eq!(truncate_label("lime", 9), "lime");
/// ```
pub fn truncate_label(label: &str, max_width: usize) -> String {
    if display_width(label) <= max_width {
        return label.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Short tag for a label: the initials of its first two words, uppercased
pub fn initials(label: &str) -> String {
    label
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label_untouched() {
        assert_eq!(truncate_label("gin", 10), "gin");
        assert_eq!(truncate_label("", 3), "");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        let cut = truncate_label("simple syrup", 6);
        assert_eq!(cut, "simpl…");
        assert_eq!(display_width(&cut), 6);
    }

    #[test]
    fn test_truncate_zero_width() {
        assert_eq!(truncate_label("orgeat", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK character takes two columns
        let cut = truncate_label("梅酒リキュール", 5);
        assert!(display_width(&cut) <= 5);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("lemon juice"), "LJ");
        assert_eq!(initials("angostura"), "A");
        assert_eq!(initials("  "), "");
    }
}
