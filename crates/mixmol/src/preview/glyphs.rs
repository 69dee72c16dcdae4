//! Node glyphs for the text preview

use crate::core::IngredientType;

/// Character drawn at a node's cell
///
/// Types sharing an initial take the uppercase letter for the first one
/// declared and lowercase for the second (sweet `S`, salt `s`).
pub fn node_glyph(kind: IngredientType, ascii: bool) -> char {
    match kind {
        IngredientType::Spirit => {
            if ascii {
                'H'
            } else {
                '⬡'
            }
        }
        IngredientType::Junction => {
            if ascii {
                '+'
            } else {
                '·'
            }
        }
        IngredientType::Acid => 'A',
        IngredientType::Sweet => 'S',
        IngredientType::Bitter => 'B',
        IngredientType::Garnish => 'G',
        IngredientType::Dilution => 'D',
        IngredientType::Dairy => 'd',
        IngredientType::Salt => 's',
        IngredientType::Egg => 'E',
        IngredientType::Other => 'O',
    }
}

/// Reverse of [`node_glyph`], for colorizing rendered output
pub fn kind_for_glyph(c: char) -> Option<IngredientType> {
    IngredientType::ALL
        .iter()
        .copied()
        .find(|kind| node_glyph(*kind, false) == c || node_glyph(*kind, true) == c)
}

/// One `glyph type` entry per type present, in declaration order
pub fn legend(kinds: &[IngredientType], ascii: bool) -> String {
    IngredientType::ALL
        .iter()
        .filter(|k| kinds.contains(k) && **k != IngredientType::Junction)
        .map(|k| format!("{} {}", node_glyph(*k, ascii), k))
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_are_distinct() {
        for ascii in [false, true] {
            let mut glyphs: Vec<char> = IngredientType::ALL.iter().map(|k| node_glyph(*k, ascii)).collect();
            glyphs.sort_unstable();
            glyphs.dedup();
            assert_eq!(glyphs.len(), IngredientType::ALL.len());
        }
    }

    #[test]
    fn test_glyph_round_trip() {
        assert_eq!(kind_for_glyph('⬡'), Some(IngredientType::Spirit));
        assert_eq!(kind_for_glyph('H'), Some(IngredientType::Spirit));
        assert_eq!(kind_for_glyph('s'), Some(IngredientType::Salt));
        assert_eq!(kind_for_glyph('x'), None);
    }

    #[test]
    fn test_legend_skips_junction() {
        let text = legend(&[IngredientType::Acid, IngredientType::Junction, IngredientType::Spirit], true);
        assert_eq!(text, "H spirit  A acid");
    }
}
