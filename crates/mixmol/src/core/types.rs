//! Core type definitions for molecule layout
//!
//! This module contains the fundamental types shared by every stage of the
//! pipeline: ingredient types, classified ingredients, laid-out nodes and the
//! per-call layout options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::MoleculeError;
use super::geometry::Point;

/// Ingredient type as assigned by the upstream classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientType {
    /// Base spirit, sits on a hexagon
    Spirit,
    /// Citrus and other acids
    Acid,
    /// Syrups, liqueurs and other sweeteners
    Sweet,
    /// Bitters and amari
    Bitter,
    /// Garnishes
    Garnish,
    /// Water, soda, ice
    Dilution,
    /// Cream, milk
    Dairy,
    /// Salt and saline
    Salt,
    /// Egg white or yolk
    Egg,
    /// Invisible branching point
    Junction,
    /// Anything the classifier could not place
    #[default]
    Other,
}

impl IngredientType {
    /// Every type, in declaration order
    pub const ALL: [IngredientType; 11] = [
        IngredientType::Spirit,
        IngredientType::Acid,
        IngredientType::Sweet,
        IngredientType::Bitter,
        IngredientType::Garnish,
        IngredientType::Dilution,
        IngredientType::Dairy,
        IngredientType::Salt,
        IngredientType::Egg,
        IngredientType::Junction,
        IngredientType::Other,
    ];

    /// Returns true if further chain links may pass through a node of this type
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            IngredientType::Acid | IngredientType::Sweet | IngredientType::Dilution
        )
    }

    /// Returns true if a node of this type ends a chain
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IngredientType::Garnish
                | IngredientType::Bitter
                | IngredientType::Salt
                | IngredientType::Dairy
                | IngredientType::Egg
        )
    }

    /// Lowercase name used in recipe notation and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientType::Spirit => "spirit",
            IngredientType::Acid => "acid",
            IngredientType::Sweet => "sweet",
            IngredientType::Bitter => "bitter",
            IngredientType::Garnish => "garnish",
            IngredientType::Dilution => "dilution",
            IngredientType::Dairy => "dairy",
            IngredientType::Salt => "salt",
            IngredientType::Egg => "egg",
            IngredientType::Junction => "junction",
            IngredientType::Other => "other",
        }
    }
}

impl fmt::Display for IngredientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngredientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        IngredientType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| format!("Unknown ingredient type: {}", s))
    }
}

/// An ingredient after parsing and type classification
///
/// Produced outside the layout engine and treated as immutable by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedIngredient {
    pub name: String,
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: IngredientType,
}

impl ClassifiedIngredient {
    /// Create an ingredient with no amount, unit or modifiers
    pub fn new(name: impl Into<String>, kind: IngredientType) -> Self {
        let name = name.into();
        Self {
            raw: name.clone(),
            name,
            amount: None,
            unit: None,
            modifiers: Vec::new(),
            kind,
        }
    }

    /// Attach an amount and an optional unit
    pub fn with_amount(mut self, amount: f64, unit: Option<&str>) -> Self {
        self.amount = Some(amount);
        self.unit = unit.map(str::to_string);
        self
    }

    /// Attach preparation modifiers ("fresh", "muddled", ...)
    pub fn with_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the original source text
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }
}

/// A positioned node ready for a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoleculeNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IngredientType,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub label: String,
    pub sublabel: Option<String>,
    pub color: String,
    /// Node this one bonds back to
    pub parent_id: Option<String>,
    /// True if further chain links may pass through this node
    pub is_inline: bool,
    /// Direction (radians) used to compute the next chain link
    pub outgoing_angle: f64,
    pub ring_id: Option<String>,
    pub ring_index: Option<usize>,
    pub ring_size: Option<usize>,
}

impl MoleculeNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns true for synthetic branching nodes
    pub fn is_junction(&self) -> bool {
        self.kind == IngredientType::Junction && self.radius == 0.0
    }

    /// Returns true if the node belongs to a ring
    pub fn is_ring_member(&self) -> bool {
        self.ring_id.is_some()
    }
}

/// Per-call layout options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Default radius of a non-spirit node
    pub base_radius: f64,
    /// Margin kept free on every side of the canvas
    pub padding: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            base_radius: 14.0,
            padding: 20.0,
        }
    }
}

impl LayoutOptions {
    /// Create options for a canvas of the given size with default radius and padding
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_base_radius(mut self, base_radius: f64) -> Self {
        self.base_radius = base_radius;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Canvas center
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a point into the padded canvas rectangle
    ///
    /// Never panics, even for a canvas narrower than its padding.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.max(self.padding).min(self.width - self.padding),
            point.y.max(self.padding).min(self.height - self.padding),
        )
    }

    /// Returns true if the point lies inside the padded canvas rectangle
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.padding
            && point.x <= self.width - self.padding
            && point.y >= self.padding
            && point.y <= self.height - self.padding
    }

    /// Check that the options describe a usable canvas
    pub fn validate(&self) -> Result<(), MoleculeError> {
        let all_finite = [self.width, self.height, self.base_radius, self.padding]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(MoleculeError::invalid_options(
                "layout options must be finite numbers".to_string(),
            ));
        }
        if self.padding < 0.0 {
            return Err(MoleculeError::invalid_options(format!(
                "padding must not be negative (got {})",
                self.padding
            )));
        }
        if self.width <= 2.0 * self.padding || self.height <= 2.0 * self.padding {
            return Err(MoleculeError::invalid_options(format!(
                "canvas {}x{} leaves no room inside padding {}",
                self.width, self.height, self.padding
            )));
        }
        if self.base_radius <= 0.0 {
            return Err(MoleculeError::invalid_options(format!(
                "base radius must be positive (got {})",
                self.base_radius
            )));
        }
        Ok(())
    }
}
