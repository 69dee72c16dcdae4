//! Node and backbone factory
//!
//! Builds the output node records and the decorative backbone shape. Display
//! text and colors come from a [`NodeDecorator`], the seam where a host
//! application plugs in its own label formatter and palette.

use serde::{Deserialize, Serialize};

use super::LayoutConfig;
use crate::core::{
    hexagon_points, triangle_points, ClassifiedIngredient, IngredientType, LayoutOptions,
    MoleculeNode, Point,
};

/// Supplies display text and colors for nodes
pub trait NodeDecorator: Send + Sync {
    /// Main label shown on the node
    fn label(&self, ingredient: &ClassifiedIngredient) -> String;

    /// Secondary line, usually the measure
    fn sublabel(&self, ingredient: &ClassifiedIngredient) -> Option<String>;

    /// Fill color for a node type
    fn color(&self, kind: IngredientType) -> String;
}

/// Built-in decorator: name as label, measure as sublabel, fixed palette
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecorator;

impl NodeDecorator for DefaultDecorator {
    fn label(&self, ingredient: &ClassifiedIngredient) -> String {
        ingredient.name.trim().to_string()
    }

    fn sublabel(&self, ingredient: &ClassifiedIngredient) -> Option<String> {
        let measure = match (ingredient.amount, ingredient.unit.as_deref()) {
            (Some(amount), Some(unit)) if !unit.is_empty() => {
                Some(format!("{} {}", format_amount(amount), unit))
            }
            (Some(amount), _) => Some(format_amount(amount)),
            (None, Some(unit)) if !unit.is_empty() => Some(unit.to_string()),
            _ => None,
        };
        match (measure, ingredient.modifiers.is_empty()) {
            (Some(m), true) => Some(m),
            (Some(m), false) => Some(format!("{}, {}", m, ingredient.modifiers.join(", "))),
            (None, false) => Some(ingredient.modifiers.join(", ")),
            (None, true) => None,
        }
    }

    fn color(&self, kind: IngredientType) -> String {
        match kind {
            IngredientType::Spirit => "#c8813a",
            IngredientType::Acid => "#e8d44d",
            IngredientType::Sweet => "#e58fb1",
            IngredientType::Bitter => "#8b3a3a",
            IngredientType::Garnish => "#5fa55a",
            IngredientType::Dilution => "#7fb8d8",
            IngredientType::Dairy => "#f1ead2",
            IngredientType::Salt => "#d9d9d9",
            IngredientType::Egg => "#f3d98b",
            IngredientType::Junction => "transparent",
            IngredientType::Other => "#9a9a9a",
        }
        .to_string()
    }
}

/// Format an amount without trailing zeros: 2 → "2", 0.75 → "0.75"
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        let s = format!("{:.2}", amount);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Creates node records for one layout call
pub struct NodeFactory<'a> {
    options: &'a LayoutOptions,
    config: &'a LayoutConfig,
    decorator: &'a dyn NodeDecorator,
    junctions: usize,
}

impl<'a> NodeFactory<'a> {
    pub fn new(
        options: &'a LayoutOptions,
        config: &'a LayoutConfig,
        decorator: &'a dyn NodeDecorator,
    ) -> Self {
        Self {
            options,
            config,
            decorator,
            junctions: 0,
        }
    }

    /// Number of junction nodes created so far
    pub fn junction_count(&self) -> usize {
        self.junctions
    }

    /// Stable id for the ingredient at `index`
    ///
    /// Inputs typed as junctions get an `input-` id so they never clash with
    /// the synthetic `junction-N` nodes.
    pub fn ingredient_id(index: usize, kind: IngredientType) -> String {
        match kind {
            IngredientType::Junction => format!("input-{}", index),
            _ => format!("{}-{}", kind, index),
        }
    }

    /// Visual radius for a node type
    pub fn radius_for(&self, kind: IngredientType) -> f64 {
        match kind {
            IngredientType::Spirit => self.options.base_radius * self.config.spirit_radius_scale,
            _ => self.options.base_radius,
        }
    }

    /// Node for an input ingredient
    pub fn ingredient_node(
        &self,
        index: usize,
        ingredient: &ClassifiedIngredient,
        position: Point,
        parent_id: Option<String>,
        outgoing_angle: f64,
    ) -> MoleculeNode {
        MoleculeNode {
            id: Self::ingredient_id(index, ingredient.kind),
            kind: ingredient.kind,
            x: position.x,
            y: position.y,
            radius: self.radius_for(ingredient.kind),
            label: self.decorator.label(ingredient),
            sublabel: self.decorator.sublabel(ingredient),
            color: self.decorator.color(ingredient.kind),
            parent_id,
            is_inline: ingredient.kind.is_inline(),
            outgoing_angle,
            ring_id: None,
            ring_index: None,
            ring_size: None,
        }
    }

    /// Invisible zero-radius branching node
    pub fn junction_node(
        &mut self,
        position: Point,
        parent_id: Option<String>,
        outgoing_angle: f64,
    ) -> MoleculeNode {
        let id = format!("junction-{}", self.junctions);
        self.junctions += 1;
        MoleculeNode {
            id,
            kind: IngredientType::Junction,
            x: position.x,
            y: position.y,
            radius: 0.0,
            label: String::new(),
            sublabel: None,
            color: self.decorator.color(IngredientType::Junction),
            parent_id,
            is_inline: true,
            outgoing_angle,
            ring_id: None,
            ring_index: None,
            ring_size: None,
        }
    }
}

/// Decorative backbone drawn behind the graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Backbone {
    pub center: Point,
    pub radius: f64,
}

impl Backbone {
    /// Hexagon outline, corner 0 first
    pub fn hexagon(&self) -> [Point; 6] {
        hexagon_points(self.center, self.radius)
    }

    /// Triangle outline, apex up
    pub fn triangle(&self) -> [Point; 3] {
        triangle_points(self.center, self.radius)
    }
}

/// Backbone centered on the first spirit node, or the canvas center without one
pub fn backbone_shape(
    nodes: &[MoleculeNode],
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> Backbone {
    let center = nodes
        .iter()
        .find(|n| n.kind == IngredientType::Spirit)
        .map(MoleculeNode::position)
        .unwrap_or_else(|| options.center());
    Backbone {
        center,
        radius: config.hex_radius,
    }
}
