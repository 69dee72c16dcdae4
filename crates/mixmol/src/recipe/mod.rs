//! Recipe readers
//!
//! Two input formats produce [`ClassifiedIngredient`] lists: the line-based
//! typed notation (see [`notation`]) and a JSON array of ingredient records.
//! Neither classifies anything; every ingredient arrives with its type.

pub mod notation;

use chumsky::Parser as _;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, span, trace, Level};

use crate::core::{ClassifiedIngredient, MoleculeError};

/// Comment marker for the notation format
pub const COMMENT_PREFIX: char = '#';

/// Supported recipe formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeFormat {
    Notation,
    Json,
}

impl RecipeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeFormat::Notation => "notation",
            RecipeFormat::Json => "json",
        }
    }
}

impl fmt::Display for RecipeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "notation" | "text" | "txt" => Ok(RecipeFormat::Notation),
            "json" => Ok(RecipeFormat::Json),
            _ => Err(format!("Unknown recipe format: {}", s)),
        }
    }
}

/// Guess the format from the first non-whitespace character
pub fn detect_format(input: &str) -> RecipeFormat {
    match input.trim_start().chars().next() {
        Some('[') | Some('{') => RecipeFormat::Json,
        _ => RecipeFormat::Notation,
    }
}

/// Parse a recipe in whichever format it appears to be
pub fn parse_recipe(input: &str) -> Result<Vec<ClassifiedIngredient>, MoleculeError> {
    let format = detect_format(input);
    trace!(%format, "Detected recipe format");
    parse_recipe_as(input, format)
}

/// Parse a recipe in a known format
pub fn parse_recipe_as(
    input: &str,
    format: RecipeFormat,
) -> Result<Vec<ClassifiedIngredient>, MoleculeError> {
    let parse_span = span!(Level::DEBUG, "parse_recipe", %format, input_len = input.len());
    let _enter = parse_span.enter();

    let ingredients = match format {
        RecipeFormat::Notation => parse_notation(input)?,
        RecipeFormat::Json => parse_json(input)?,
    };
    debug!(ingredient_count = ingredients.len(), "Parsed recipe");
    Ok(ingredients)
}

/// Parse the line-based notation
///
/// Blank lines and lines starting with `#` are skipped. The first bad line
/// aborts with its 1-based line and column.
pub fn parse_notation(input: &str) -> Result<Vec<ClassifiedIngredient>, MoleculeError> {
    let parser = notation::line_parser();
    let mut ingredients = Vec::new();

    for (line_index, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
            continue;
        }

        match parser.parse(line).into_result() {
            Ok(mut ingredient) => {
                ingredient.raw = trimmed.to_string();
                trace!(line = line_index + 1, name = %ingredient.name, kind = %ingredient.kind, "Parsed ingredient");
                ingredients.push(ingredient);
            }
            Err(errors) => {
                let (message, offset) = errors
                    .first()
                    .map(|e| (e.to_string(), e.span().start))
                    .unwrap_or_else(|| ("invalid ingredient line".to_string(), 0));
                let column = line
                    .get(..offset)
                    .map(|prefix| prefix.chars().count())
                    .unwrap_or(0)
                    + 1;
                return Err(MoleculeError::parse_error(message, line_index + 1, column));
            }
        }
    }

    Ok(ingredients)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRecipe {
    List(Vec<ClassifiedIngredient>),
    Wrapped { ingredients: Vec<ClassifiedIngredient> },
}

/// Parse a JSON array of ingredients, or an object with an `ingredients` array
pub fn parse_json(input: &str) -> Result<Vec<ClassifiedIngredient>, MoleculeError> {
    let recipe: JsonRecipe = serde_json::from_str(input)?;
    let mut ingredients = match recipe {
        JsonRecipe::List(list) => list,
        JsonRecipe::Wrapped { ingredients } => ingredients,
    };
    for (index, ingredient) in ingredients.iter_mut().enumerate() {
        if ingredient.name.trim().is_empty() {
            return Err(MoleculeError::input_error(format!(
                "ingredient {} has an empty name",
                index
            )));
        }
        if ingredient.raw.is_empty() {
            ingredient.raw = ingredient.name.clone();
        }
    }
    Ok(ingredients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IngredientType;

    const DAIQUIRI: &str = "\
# classic daiquiri
spirit: 2 oz white rum

acid: 1 oz lime juice (fresh)
sweet: 3/4 oz simple syrup
";

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("  [ ]"), RecipeFormat::Json);
        assert_eq!(detect_format("{\"ingredients\": []}"), RecipeFormat::Json);
        assert_eq!(detect_format("spirit: gin"), RecipeFormat::Notation);
        assert_eq!(detect_format(""), RecipeFormat::Notation);
    }

    #[test]
    fn test_parse_notation_skips_comments() {
        let recipe = parse_recipe(DAIQUIRI).unwrap();
        assert_eq!(recipe.len(), 3);
        assert_eq!(recipe[0].kind, IngredientType::Spirit);
        assert_eq!(recipe[0].raw, "spirit: 2 oz white rum");
        assert_eq!(recipe[2].amount, Some(0.75));
    }

    #[test]
    fn test_error_position() {
        let err = parse_notation("spirit: gin\nsirup: 1 oz honey\n").unwrap_err();
        match err {
            MoleculeError::ParseError { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_json_array() {
        let json = r#"[{"name": "gin", "type": "spirit", "amount": 2, "unit": "oz"},
                       {"name": "tonic", "type": "dilution"}]"#;
        let recipe = parse_recipe(json).unwrap();
        assert_eq!(recipe.len(), 2);
        assert_eq!(recipe[1].kind, IngredientType::Dilution);
        assert_eq!(recipe[1].raw, "tonic");
    }

    #[test]
    fn test_parse_json_wrapped() {
        let json = r#"{"ingredients": [{"name": "mezcal", "type": "spirit"}]}"#;
        assert_eq!(parse_recipe(json).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_json_rejects_empty_name() {
        let err = parse_json(r#"[{"name": " ", "type": "acid"}]"#).unwrap_err();
        assert!(matches!(err, MoleculeError::InputError { .. }));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<RecipeFormat>(), Ok(RecipeFormat::Json));
        assert_eq!("text".parse::<RecipeFormat>(), Ok(RecipeFormat::Notation));
        assert!("yaml".parse::<RecipeFormat>().is_err());
    }
}
