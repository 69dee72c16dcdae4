//! WebAssembly bindings
//!
//! Browser-facing wrappers around the recipe reader, the layout engine and
//! the text preview. Errors are returned to JavaScript as strings.

use wasm_bindgen::prelude::*;

use crate::core::LayoutOptions;
use crate::layout::MoleculeLayoutAlgorithm;
use crate::preview::PreviewRenderer;
use crate::recipe::parse_recipe;

/// Sets up the panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn options_for(width: f64, height: f64) -> Result<LayoutOptions, JsValue> {
    let options = LayoutOptions::new(width, height);
    options
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(options)
}

/// Lay out a recipe (notation or JSON) and return the layout as JSON
#[wasm_bindgen]
pub fn layout_json(input: &str, width: f64, height: f64) -> Result<String, JsValue> {
    let options = options_for(width, height)?;
    let ingredients = parse_recipe(input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let layout = MoleculeLayoutAlgorithm::new().layout(&ingredients, &options);
    serde_json::to_string(&layout).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Lay out a recipe and return its text preview
#[wasm_bindgen]
pub fn preview_text(input: &str, width: f64, height: f64) -> Result<String, JsValue> {
    let options = options_for(width, height)?;
    let ingredients = parse_recipe(input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let layout = MoleculeLayoutAlgorithm::new().layout(&ingredients, &options);
    Ok(PreviewRenderer::new().render_layout(&layout, &options))
}
