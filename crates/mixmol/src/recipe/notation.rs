//! Line grammar for the typed recipe notation
//!
//! ```text
//! type ":" [amount] [unit] name ["(" modifier {"," modifier} ")"]
//! ```
//!
//! Amounts may be integers, decimals (`.5`), fractions (`3/4`) or mixed
//! numbers (`1 1/2`). Units come from a fixed vocabulary and must be
//! followed by whitespace; any other word starts the name.

use chumsky::prelude::*;

use crate::core::{ClassifiedIngredient, IngredientType};

type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Units the notation recognizes, lowercase
pub const UNITS: &[&str] = &[
    "oz", "ml", "cl", "dash", "dashes", "drop", "drops", "tsp", "tbsp", "barspoon", "barspoons",
    "part", "parts", "cup", "cups", "slice", "slices", "leaf", "leaves", "sprig", "sprigs",
    "pinch",
];

/// Type keywords accepted before the colon
pub fn type_keywords() -> impl Iterator<Item = &'static str> {
    IngredientType::ALL
        .iter()
        .filter(|k| **k != IngredientType::Junction)
        .map(|k| k.as_str())
}

fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    one_of(" \t").repeated().ignored()
}

fn inline_whitespace_required<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    one_of(" \t").repeated().at_least(1).ignored()
}

fn digits<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    one_of('0'..='9').repeated().at_least(1).collect::<String>()
}

/// Parse `type` before the colon
fn kind_parser<'src>() -> impl Parser<'src, &'src str, IngredientType, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_alphabetic())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|word, span| match word.parse::<IngredientType>() {
            Ok(IngredientType::Junction) | Err(_) => Err(Rich::custom(
                span,
                format!(
                    "unknown ingredient type '{}', expected one of: {}",
                    word,
                    type_keywords().collect::<Vec<_>>().join(", ")
                ),
            )),
            Ok(kind) => Ok(kind),
        })
}

/// Parse `a/b`
fn fraction<'src>() -> impl Parser<'src, &'src str, f64, Extra<'src>> + Clone {
    digits()
        .then_ignore(just('/'))
        .then(digits())
        .try_map(|(num, den), span| {
            let num: f64 = num.parse().map_err(|_| Rich::custom(span, "invalid numerator"))?;
            let den: f64 = den.parse().map_err(|_| Rich::custom(span, "invalid denominator"))?;
            if den == 0.0 {
                return Err(Rich::custom(span, "fraction with zero denominator"));
            }
            Ok(num / den)
        })
}

/// Parse an amount in any supported form
pub(crate) fn amount_parser<'src>() -> impl Parser<'src, &'src str, f64, Extra<'src>> + Clone {
    let mixed = digits()
        .then_ignore(inline_whitespace_required())
        .then(fraction())
        .try_map(|(whole, frac), span| {
            whole
                .parse::<f64>()
                .map(|w| w + frac)
                .map_err(|_| Rich::custom(span, "invalid whole number"))
        });

    let decimal = digits()
        .or_not()
        .then_ignore(just('.'))
        .then(digits())
        .try_map(|(whole, frac), span| {
            format!("{}.{}", whole.unwrap_or_else(|| "0".to_string()), frac)
                .parse::<f64>()
                .map_err(|_| Rich::custom(span, "invalid decimal"))
        });

    let integer = digits().try_map(|s, span| {
        s.parse::<f64>()
            .map_err(|_| Rich::custom(span, "invalid number"))
    });

    mixed.or(fraction()).or(decimal).or(integer)
}

/// Parse a unit word followed by whitespace
fn unit_parser<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_alphabetic())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|word, span| {
            let lowered = word.to_lowercase();
            if UNITS.contains(&lowered.as_str()) {
                Ok(lowered)
            } else {
                Err(Rich::custom(span, format!("'{}' is not a unit", word)))
            }
        })
        .then_ignore(inline_whitespace_required())
}

fn name_parser<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    none_of("()\n")
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|name, span| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                Err(Rich::custom(span, "missing ingredient name"))
            } else {
                Ok(trimmed.to_string())
            }
        })
}

fn modifiers_parser<'src>() -> impl Parser<'src, &'src str, Vec<String>, Extra<'src>> + Clone {
    none_of(",()\n")
        .repeated()
        .collect::<String>()
        .map(|m| m.trim().to_string())
        .separated_by(just(','))
        .collect::<Vec<String>>()
        .delimited_by(just('('), just(')'))
        .map(|mods| mods.into_iter().filter(|m| !m.is_empty()).collect())
}

/// Parse a full ingredient line (no comments, not blank)
pub(crate) fn line_parser<'src>(
) -> impl Parser<'src, &'src str, ClassifiedIngredient, Extra<'src>> + Clone {
    inline_whitespace()
        .ignore_then(kind_parser())
        .then_ignore(inline_whitespace())
        .then_ignore(just(':'))
        .then_ignore(inline_whitespace())
        .then(amount_parser().then_ignore(inline_whitespace()).or_not())
        .then(unit_parser().or_not())
        .then(name_parser())
        .then(modifiers_parser().or_not())
        .then_ignore(inline_whitespace())
        .then_ignore(end())
        .map(|((((kind, amount), unit), name), modifiers)| ClassifiedIngredient {
            raw: String::new(),
            name,
            amount,
            unit,
            modifiers: modifiers.unwrap_or_default(),
            kind,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(input: &str) -> Option<f64> {
        amount_parser().then_ignore(end()).parse(input).into_result().ok()
    }

    fn line(input: &str) -> ClassifiedIngredient {
        line_parser().parse(input).into_result().unwrap()
    }

    #[test]
    fn test_amount_forms() {
        assert_eq!(amount("2"), Some(2.0));
        assert_eq!(amount("1.5"), Some(1.5));
        assert_eq!(amount(".5"), Some(0.5));
        assert_eq!(amount("3/4"), Some(0.75));
        assert_eq!(amount("1 1/2"), Some(1.5));
        assert_eq!(amount("1/0"), None);
        assert_eq!(amount("abc"), None);
    }

    #[test]
    fn test_full_line() {
        let lemon = line("acid: 3/4 oz lemon juice (fresh, strained)");
        assert_eq!(lemon.kind, IngredientType::Acid);
        assert_eq!(lemon.amount, Some(0.75));
        assert_eq!(lemon.unit.as_deref(), Some("oz"));
        assert_eq!(lemon.name, "lemon juice");
        assert_eq!(lemon.modifiers, vec!["fresh", "strained"]);
    }

    #[test]
    fn test_name_only() {
        let twist = line("garnish: lemon twist");
        assert_eq!(twist.amount, None);
        assert_eq!(twist.unit, None);
        assert_eq!(twist.name, "lemon twist");
    }

    #[test]
    fn test_amount_without_unit() {
        let egg = line("egg: 1 egg white");
        assert_eq!(egg.amount, Some(1.0));
        assert_eq!(egg.unit, None);
        assert_eq!(egg.name, "egg white");
    }

    #[test]
    fn test_unit_is_case_insensitive() {
        let bitters = line("  Bitter : 2 Dashes angostura");
        assert_eq!(bitters.kind, IngredientType::Bitter);
        assert_eq!(bitters.unit.as_deref(), Some("dashes"));
        assert_eq!(bitters.name, "angostura");
    }

    #[test]
    fn test_unit_prefix_word_is_name() {
        let ozark = line("spirit: ozark moonshine");
        assert_eq!(ozark.unit, None);
        assert_eq!(ozark.name, "ozark moonshine");
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert!(line_parser().parse("junction: 1 oz x").into_result().is_err());
        assert!(line_parser().parse("syrup: 1 oz x").into_result().is_err());
        assert!(line_parser().parse("acid 1 oz lime").into_result().is_err());
        assert!(line_parser().parse("acid: 1 oz").into_result().is_ok());
        assert!(line_parser().parse("acid:").into_result().is_err());
        assert!(line_parser().parse("acid: lime (fresh").into_result().is_err());
    }

    #[test]
    fn test_type_keywords_skip_junction() {
        let keywords: Vec<_> = type_keywords().collect();
        assert!(keywords.contains(&"spirit"));
        assert!(!keywords.contains(&"junction"));
    }
}
