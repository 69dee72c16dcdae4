//! Terminal colorization for molecule previews
//!
//! Applies ANSI escape codes to node glyphs and bonds using crossterm.

use crossterm::style::{Color, Stylize};
use mixmol::preview::kind_for_glyph;
use mixmol::IngredientType;

/// Color used for a node glyph of the given type
pub fn type_color(kind: IngredientType) -> Color {
    match kind {
        IngredientType::Spirit => Color::DarkYellow,
        IngredientType::Acid => Color::Yellow,
        IngredientType::Sweet => Color::Magenta,
        IngredientType::Bitter => Color::Red,
        IngredientType::Garnish => Color::Green,
        IngredientType::Dilution => Color::Blue,
        IngredientType::Dairy => Color::White,
        IngredientType::Salt => Color::Grey,
        IngredientType::Egg => Color::DarkYellow,
        IngredientType::Junction => Color::DarkGrey,
        IngredientType::Other => Color::Grey,
    }
}

/// Colorize preview output using ANSI escape codes
///
/// - Node glyphs: colored by ingredient type
/// - Bonds: Cyan
/// - Labels: Default (terminal color)
pub fn colorize_preview(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);

    for line in input.lines() {
        let chars: Vec<char> = line.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            let prev = i.checked_sub(1).and_then(|j| chars.get(j)).copied();
            let next = chars.get(i + 1).copied();
            let standalone = !prev.is_some_and(char::is_alphanumeric)
                && !next.is_some_and(char::is_alphanumeric);

            let colored = match c {
                '─' | '│' | '╱' | '╲' => format!("{}", c.to_string().with(Color::Cyan)),
                '-' | '|' | '/' | '\\' if standalone => {
                    format!("{}", c.to_string().with(Color::Cyan))
                }
                _ if standalone => match kind_for_glyph(c) {
                    Some(kind) => format!("{}", c.to_string().with(type_color(kind))),
                    None => c.to_string(),
                },
                _ => c.to_string(),
            };
            result.push_str(&colored);
        }
        result.push('\n');
    }

    // Keep the input's trailing-newline shape
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_are_colored() {
        let out = colorize_preview("⬡ gin");
        assert!(out.contains("\x1b["));
        assert!(out.ends_with("gin"));
    }

    #[test]
    fn test_label_letters_untouched() {
        let out = colorize_preview("Amaro Montenegro");
        assert_eq!(out, "Amaro Montenegro");
    }

    #[test]
    fn test_hyphenated_label_untouched() {
        let out = colorize_preview("blood-orange");
        assert_eq!(out, "blood-orange");
    }

    #[test]
    fn test_bonds_are_colored() {
        let out = colorize_preview("A──⬡");
        assert!(out.matches("\x1b[").count() >= 4);
    }

    #[test]
    fn test_trailing_newline_preserved() {
        assert!(colorize_preview("A\n").ends_with('\n'));
        assert!(!colorize_preview("A").ends_with('\n'));
    }

    #[test]
    fn test_spirit_and_egg_share_color() {
        assert_eq!(type_color(IngredientType::Spirit), type_color(IngredientType::Egg));
        assert_ne!(type_color(IngredientType::Acid), type_color(IngredientType::Sweet));
    }
}
