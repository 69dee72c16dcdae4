//! Spirit-family resolution and diagram rotation
//!
//! Each spirit is matched against a keyword table to find its family. The
//! majority family picks a whole-diagram rotation, and every corner
//! preference is shifted back by the same number of corners so that, once
//! the renderer applies the rotation, acids still face east.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::core::{ClassifiedIngredient, CORNER_COUNT};

/// Coarse spirit category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiritFamily {
    Whiskey,
    Rum,
    Gin,
    Tequila,
    Vodka,
    Brandy,
    #[default]
    Other,
}

/// Keyword table, scanned in order; the first hit wins
const FAMILY_KEYWORDS: &[(SpiritFamily, &[&str])] = &[
    (
        SpiritFamily::Whiskey,
        &["whiskey", "whisky", "bourbon", "scotch", "rye"],
    ),
    (SpiritFamily::Rum, &["rum", "rhum", "cachaça", "cachaca"]),
    (SpiritFamily::Gin, &["gin", "genever"]),
    (SpiritFamily::Tequila, &["tequila", "mezcal"]),
    (SpiritFamily::Vodka, &["vodka"]),
    (
        SpiritFamily::Brandy,
        &["brandy", "cognac", "armagnac", "pisco", "calvados"],
    ),
];

impl SpiritFamily {
    /// Every family, in vote tie-break order
    pub const ALL: [SpiritFamily; 7] = [
        SpiritFamily::Whiskey,
        SpiritFamily::Rum,
        SpiritFamily::Gin,
        SpiritFamily::Tequila,
        SpiritFamily::Vodka,
        SpiritFamily::Brandy,
        SpiritFamily::Other,
    ];

    /// Classify a spirit by case-insensitive keyword match on its name
    pub fn classify(name: &str) -> Self {
        let lowered = name.to_lowercase();
        FAMILY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(family, _)| *family)
            .unwrap_or(SpiritFamily::Other)
    }

    /// Whole-diagram rotation for this family, in degrees
    pub fn rotation_degrees(&self) -> f64 {
        match self {
            SpiritFamily::Whiskey | SpiritFamily::Other => 0.0,
            SpiritFamily::Rum => 60.0,
            SpiritFamily::Gin => 120.0,
            SpiritFamily::Tequila => 180.0,
            SpiritFamily::Vodka => 240.0,
            SpiritFamily::Brandy => 300.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpiritFamily::Whiskey => "whiskey",
            SpiritFamily::Rum => "rum",
            SpiritFamily::Gin => "gin",
            SpiritFamily::Tequila => "tequila",
            SpiritFamily::Vodka => "vodka",
            SpiritFamily::Brandy => "brandy",
            SpiritFamily::Other => "other",
        }
    }

    fn index(&self) -> usize {
        SpiritFamily::ALL
            .iter()
            .position(|f| f == self)
            .unwrap_or(SpiritFamily::ALL.len() - 1)
    }
}

impl fmt::Display for SpiritFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the diagram's family by majority vote over its spirits
///
/// Ties go to the first spirit's family when it is among the tied families,
/// otherwise to the tied family listed first in [`SpiritFamily::ALL`].
pub fn resolve_family(spirits: &[&ClassifiedIngredient]) -> SpiritFamily {
    let Some(first) = spirits.first() else {
        return SpiritFamily::Other;
    };

    let mut counts = [0usize; SpiritFamily::ALL.len()];
    for spirit in spirits {
        counts[SpiritFamily::classify(&spirit.name).index()] += 1;
    }
    let best = counts.iter().copied().max().unwrap_or(0);

    let first_family = SpiritFamily::classify(&first.name);
    if counts[first_family.index()] == best {
        return first_family;
    }
    SpiritFamily::ALL
        .iter()
        .copied()
        .find(|f| counts[f.index()] == best)
        .unwrap_or(SpiritFamily::Other)
}

/// Number of corners a rotation of `rotation_degrees` moves things by
pub fn corner_shift(rotation_degrees: f64) -> usize {
    let steps = (rotation_degrees / 60.0).round() as i64;
    steps.rem_euclid(CORNER_COUNT as i64) as usize
}

/// Shift preferred corners backward so they land where intended after rotation
pub fn shift_corners(preferred: &[usize], rotation_degrees: f64) -> Vec<usize> {
    let shift = corner_shift(rotation_degrees);
    preferred
        .iter()
        .map(|c| (c % CORNER_COUNT + CORNER_COUNT - shift) % CORNER_COUNT)
        .collect()
}

/// Resolved rotation for one diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramRotation {
    pub family: SpiritFamily,
    pub degrees: f64,
}

impl DiagramRotation {
    /// Resolve the rotation for a recipe's spirits
    pub fn for_spirits(spirits: &[&ClassifiedIngredient]) -> Self {
        let family = resolve_family(spirits);
        let degrees = family.rotation_degrees();
        debug!(%family, degrees, spirit_count = spirits.len(), "Resolved diagram rotation");
        Self { family, degrees }
    }

    /// Apply the rotation compensation to a preference list
    pub fn shift(&self, preferred: &[usize]) -> Vec<usize> {
        shift_corners(preferred, self.degrees)
    }
}

impl Default for DiagramRotation {
    fn default() -> Self {
        Self {
            family: SpiritFamily::Other,
            degrees: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IngredientType;

    fn spirit(name: &str) -> ClassifiedIngredient {
        ClassifiedIngredient::new(name, IngredientType::Spirit)
    }

    #[test]
    fn test_classify_keywords() {
        assert_eq!(SpiritFamily::classify("Bourbon"), SpiritFamily::Whiskey);
        assert_eq!(SpiritFamily::classify("Islay Scotch Whisky"), SpiritFamily::Whiskey);
        assert_eq!(SpiritFamily::classify("aged rum"), SpiritFamily::Rum);
        assert_eq!(SpiritFamily::classify("London Dry Gin"), SpiritFamily::Gin);
        assert_eq!(SpiritFamily::classify("Mezcal"), SpiritFamily::Tequila);
        assert_eq!(SpiritFamily::classify("vodka"), SpiritFamily::Vodka);
        assert_eq!(SpiritFamily::classify("VSOP Cognac"), SpiritFamily::Brandy);
        assert_eq!(SpiritFamily::classify("aquavit"), SpiritFamily::Other);
    }

    #[test]
    fn test_first_table_match_wins() {
        // "rye" is checked in the whiskey row before "gin" in the gin row
        assert_eq!(SpiritFamily::classify("rye gin blend"), SpiritFamily::Whiskey);
    }

    #[test]
    fn test_majority_vote() {
        let a = spirit("gin");
        let b = spirit("bourbon");
        let c = spirit("rye whiskey");
        assert_eq!(resolve_family(&[&a, &b, &c]), SpiritFamily::Whiskey);
    }

    #[test]
    fn test_tie_prefers_first_spirit() {
        let a = spirit("vodka");
        let b = spirit("rum");
        assert_eq!(resolve_family(&[&a, &b]), SpiritFamily::Vodka);
        assert_eq!(resolve_family(&[&b, &a]), SpiritFamily::Rum);
    }

    #[test]
    fn test_tie_without_first_falls_back_to_table_order() {
        let a = spirit("cognac");
        let b = spirit("tequila");
        let c = spirit("tequila blanco");
        let d = spirit("gin");
        let e = spirit("old tom gin");
        // gin 2, tequila 2, brandy 1: first spirit is not tied
        assert_eq!(resolve_family(&[&a, &b, &c, &d, &e]), SpiritFamily::Gin);
    }

    #[test]
    fn test_no_spirits() {
        assert_eq!(resolve_family(&[]), SpiritFamily::Other);
        assert_eq!(DiagramRotation::for_spirits(&[]).degrees, 0.0);
    }

    #[test]
    fn test_corner_shift() {
        assert_eq!(corner_shift(0.0), 0);
        assert_eq!(corner_shift(60.0), 1);
        assert_eq!(corner_shift(300.0), 5);
        assert_eq!(corner_shift(360.0), 0);
        assert_eq!(corner_shift(-60.0), 5);
        assert_eq!(corner_shift(89.0), 1);
    }

    #[test]
    fn test_shift_corners_backward() {
        assert_eq!(shift_corners(&[0, 1, 5], 0.0), vec![0, 1, 5]);
        assert_eq!(shift_corners(&[0, 1, 5], 60.0), vec![5, 0, 4]);
        assert_eq!(shift_corners(&[3], 180.0), vec![0]);
    }

    #[test]
    fn test_rotation_per_family() {
        let rum = spirit("rum");
        let rotation = DiagramRotation::for_spirits(&[&rum]);
        assert_eq!(rotation.family, SpiritFamily::Rum);
        assert_eq!(rotation.degrees, 60.0);
        assert_eq!(rotation.shift(&[0]), vec![5]);
    }
}
