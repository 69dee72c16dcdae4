//! mixmol - lay out cocktail recipes as molecule diagrams
//!
//! The base spirit sits on a hexagon and everything else hangs off its six
//! corners as bonded chains, forks and rings. Layout is deterministic: the
//! same recipe and options always give the same coordinates.
//!
//! # Quick Start
//!
//! ```rust
//! use mixmol::{compute_layout, ClassifiedIngredient, IngredientType, LayoutOptions};
//!
//! let recipe = vec![
//!     ClassifiedIngredient::new("whiskey", IngredientType::Spirit).with_amount(2.0, Some("oz")),
//!     ClassifiedIngredient::new("lemon juice", IngredientType::Acid).with_amount(0.75, Some("oz")),
//! ];
//! let nodes = compute_layout(&recipe, &LayoutOptions::default());
//! assert_eq!(nodes.len(), 2);
//! ```
//!
//! # From Recipe Text
//!
//! ```rust
//! let layout = mixmol::layout_recipe("spirit: 2 oz gin\nacid: 3/4 oz lime juice").unwrap();
//! assert_eq!(layout.nodes.len(), 2);
//!
//! let text = mixmol::preview("spirit: 2 oz gin\nacid: 3/4 oz lime juice").unwrap();
//! assert!(text.contains("gin"));
//! ```

pub mod core;
pub mod layout;
pub mod preview;
pub mod recipe;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;
pub use layout::{compute_layout, try_compute_layout, LayoutConfig, MoleculeLayout, MoleculeLayoutAlgorithm};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        ClassifiedIngredient, IngredientType, LayoutOptions, MoleculeError, MoleculeNode, Point,
    };
    pub use crate::layout::{
        compute_layout, try_compute_layout, Backbone, DefaultDecorator, LayoutConfig, MoleculeLayout,
        MoleculeLayoutAlgorithm, NodeDecorator, SpiritFamily, SpiritTemplate,
    };
    pub use crate::preview::{PreviewConfig, PreviewRenderer};
    pub use crate::recipe::{detect_format, parse_recipe, RecipeFormat};
}

/// Parse recipe text (notation or JSON) and lay it out on the default canvas
pub fn layout_recipe(input: &str) -> anyhow::Result<MoleculeLayout> {
    layout_recipe_with(input, &LayoutOptions::default())
}

/// Parse recipe text and lay it out with the given options
pub fn layout_recipe_with(input: &str, options: &LayoutOptions) -> anyhow::Result<MoleculeLayout> {
    options.validate()?;
    let ingredients = recipe::parse_recipe(input)?;
    Ok(MoleculeLayoutAlgorithm::new().layout(&ingredients, options))
}

/// Parse recipe text and render a text preview of its layout
pub fn preview(input: &str) -> anyhow::Result<String> {
    let options = LayoutOptions::default();
    let layout = layout_recipe_with(input, &options)?;
    Ok(preview::PreviewRenderer::new().render_layout(&layout, &options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_recipe() {
        let layout = layout_recipe("spirit: 2 oz bourbon\nbitter: 2 dashes angostura").unwrap();
        assert_eq!(layout.nodes.len(), 2);
        assert_eq!(layout.family, layout::SpiritFamily::Whiskey);
    }

    #[test]
    fn test_layout_recipe_reports_parse_errors() {
        let err = layout_recipe("spirit 2 oz bourbon").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_layout_recipe_rejects_bad_options() {
        let options = LayoutOptions::new(10.0, 10.0);
        assert!(layout_recipe_with("spirit: gin", &options).is_err());
    }

    #[test]
    fn test_preview_empty_recipe() {
        assert_eq!(preview("# nothing yet").unwrap(), "");
    }
}
