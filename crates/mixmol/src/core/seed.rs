//! Deterministic seed generator
//!
//! Hashes an ingredient list into a 32-bit seed and derives a repeatable
//! pseudo-random sequence from it. Identical recipes always produce the same
//! seed and the same sequence on every platform.

use super::types::ClassifiedIngredient;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Hash an ingredient list into a layout seed
///
/// Names are compared case-insensitively; amount, unit and type participate
/// so that "1 oz gin" and "2 oz gin" seed differently.
pub fn seed_from_ingredients(ingredients: &[ClassifiedIngredient]) -> u32 {
    let mut hash = FNV_OFFSET;
    let mut feed = |bytes: &[u8]| {
        for b in bytes {
            hash ^= u32::from(*b);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    };

    for ingredient in ingredients {
        feed(ingredient.name.trim().to_lowercase().as_bytes());
        feed(b"|");
        if let Some(amount) = ingredient.amount {
            feed(&amount.to_bits().to_le_bytes());
        }
        feed(b"|");
        if let Some(unit) = &ingredient.unit {
            feed(unit.to_lowercase().as_bytes());
        }
        feed(b"|");
        feed(ingredient.kind.as_str().as_bytes());
        feed(b";");
    }
    hash
}

/// Repeatable pseudo-random sequence (mulberry32)
#[derive(Debug, Clone)]
pub struct SeededSequence {
    state: u32,
}

impl SeededSequence {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Build a sequence seeded from an ingredient list
    pub fn from_ingredients(ingredients: &[ClassifiedIngredient]) -> Self {
        Self::new(seed_from_ingredients(ingredients))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Next value in `[low, high)`
    pub fn next_range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Pick an index in `0..len`, or None for an empty range
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.next_u32() as usize % len)
        }
    }
}

impl Iterator for SeededSequence {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IngredientType;

    fn sour() -> Vec<ClassifiedIngredient> {
        vec![
            ClassifiedIngredient::new("Bourbon", IngredientType::Spirit).with_amount(2.0, Some("oz")),
            ClassifiedIngredient::new("lemon juice", IngredientType::Acid)
                .with_amount(0.75, Some("oz")),
        ]
    }

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(seed_from_ingredients(&sour()), seed_from_ingredients(&sour()));
    }

    #[test]
    fn test_seed_ignores_name_case() {
        let mut shouted = sour();
        shouted[0].name = "BOURBON".to_string();
        assert_eq!(seed_from_ingredients(&sour()), seed_from_ingredients(&shouted));
    }

    #[test]
    fn test_seed_depends_on_amount() {
        let mut doubled = sour();
        doubled[1].amount = Some(1.5);
        assert_ne!(seed_from_ingredients(&sour()), seed_from_ingredients(&doubled));
    }

    #[test]
    fn test_empty_seed_is_offset_basis() {
        assert_eq!(seed_from_ingredients(&[]), FNV_OFFSET);
    }

    #[test]
    fn test_sequence_repeats() {
        let a: Vec<f64> = SeededSequence::new(42).take(8).collect();
        let b: Vec<f64> = SeededSequence::new(42).take(8).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.0..1.0).contains(v)));
        let c: Vec<f64> = SeededSequence::new(43).take(8).collect();
        assert_ne!(a, c);
    }

    #[test]
    fn test_pick_and_range() {
        let mut seq = SeededSequence::new(7);
        assert_eq!(seq.pick(0), None);
        for _ in 0..32 {
            assert!(seq.pick(5).unwrap() < 5);
            let v = seq.next_range(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&v));
        }
    }
}
