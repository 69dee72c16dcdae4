//! Spirit placement planner
//!
//! Spirits are arranged by fixed templates chosen from the spirit count and
//! how their families relate, then the whole cluster is shifted so that its
//! centroid sits on the canvas center.
//!
//! Each template also carries a corner-availability table: corners pointing
//! at a neighboring spirit are closed so chains from adjacent spirits do not
//! run into each other.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, info, warn};

use super::context::{LayoutContext, SpiritSlot};
use super::family::SpiritFamily;
use crate::core::{centroid, ClassifiedIngredient, IngredientType, LayoutOptions, Point};

/// Arrangement used for the spirit cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiritTemplate {
    /// One spirit at the center
    Single,
    /// Two spirits stacked vertically
    Pair,
    /// Three same-family spirits: anchor plus two at 30° and 330°
    Triangle,
    /// Three mixed spirits: apex plus two at 210° and 330°
    Vee,
    /// Four spirits with a repeated family: left, upper-right, lower-right, far-right
    Rhombus,
    /// Vertical column, evenly spaced
    Stack,
}

const ALL_CORNERS: &[usize] = &[0, 1, 2, 3, 4, 5];
const STACK_TOP: &[usize] = &[0, 3, 4, 5];
const STACK_MIDDLE: &[usize] = &[0, 3];
const STACK_BOTTOM: &[usize] = &[0, 1, 2, 3];

const TRIANGLE_CORNERS: [&[usize]; 3] = [&[2, 3, 4], &[0, 1, 2], &[0, 4, 5]];
const VEE_CORNERS: [&[usize]; 3] = [&[1, 2], &[2, 3, 4, 5], &[0, 1, 4, 5]];
const RHOMBUS_CORNERS: [&[usize]; 4] = [&[2, 3, 4], &[4, 5], &[1, 2], &[0, 1, 5]];

impl SpiritTemplate {
    /// Pick the template for a set of spirits; None when there are none
    pub fn select(spirits: &[&ClassifiedIngredient]) -> Option<Self> {
        let families: Vec<SpiritFamily> = spirits
            .iter()
            .map(|s| SpiritFamily::classify(&s.name))
            .collect();

        let template = match families.len() {
            0 => return None,
            1 => SpiritTemplate::Single,
            2 => SpiritTemplate::Pair,
            3 => {
                if families.iter().all(|f| *f == families[0]) {
                    SpiritTemplate::Triangle
                } else {
                    SpiritTemplate::Vee
                }
            }
            4 => {
                let distinct = families
                    .iter()
                    .enumerate()
                    .all(|(i, f)| !families[..i].contains(f));
                if distinct {
                    SpiritTemplate::Stack
                } else {
                    SpiritTemplate::Rhombus
                }
            }
            _ => SpiritTemplate::Stack,
        };
        Some(template)
    }

    /// Positions relative to an arbitrary origin, before re-centering
    pub fn relative_positions(&self, count: usize, spacing: f64) -> Vec<Point> {
        let origin = Point::new(0.0, 0.0);
        let deg = |d: f64| d * PI / 180.0;
        match self {
            SpiritTemplate::Single => vec![origin],
            SpiritTemplate::Pair => vec![
                Point::new(0.0, -spacing / 2.0),
                Point::new(0.0, spacing / 2.0),
            ],
            SpiritTemplate::Triangle => vec![
                origin,
                origin.offset(deg(30.0), spacing),
                origin.offset(deg(330.0), spacing),
            ],
            SpiritTemplate::Vee => vec![
                origin,
                origin.offset(deg(210.0), spacing),
                origin.offset(deg(330.0), spacing),
            ],
            SpiritTemplate::Rhombus => {
                let upper = origin.offset(deg(330.0), spacing);
                vec![
                    origin,
                    upper,
                    origin.offset(deg(30.0), spacing),
                    upper.offset(deg(30.0), spacing),
                ]
            }
            SpiritTemplate::Stack => {
                let mid = (count.max(1) - 1) as f64 / 2.0;
                (0..count.max(1))
                    .map(|i| Point::new(0.0, (i as f64 - mid) * spacing))
                    .collect()
            }
        }
    }

    /// Corners of spirit `index` that do not face a neighbor
    pub fn available_corners(&self, index: usize, count: usize) -> &'static [usize] {
        match self {
            SpiritTemplate::Single => ALL_CORNERS,
            SpiritTemplate::Pair => {
                if index == 0 {
                    STACK_TOP
                } else {
                    STACK_BOTTOM
                }
            }
            SpiritTemplate::Triangle => TRIANGLE_CORNERS.get(index).copied().unwrap_or(ALL_CORNERS),
            SpiritTemplate::Vee => VEE_CORNERS.get(index).copied().unwrap_or(ALL_CORNERS),
            SpiritTemplate::Rhombus => RHOMBUS_CORNERS.get(index).copied().unwrap_or(ALL_CORNERS),
            SpiritTemplate::Stack => {
                if count <= 1 {
                    ALL_CORNERS
                } else if index == 0 {
                    STACK_TOP
                } else if index + 1 >= count {
                    STACK_BOTTOM
                } else {
                    STACK_MIDDLE
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpiritTemplate::Single => "single",
            SpiritTemplate::Pair => "pair",
            SpiritTemplate::Triangle => "triangle",
            SpiritTemplate::Vee => "vee",
            SpiritTemplate::Rhombus => "rhombus",
            SpiritTemplate::Stack => "stack",
        }
    }
}

impl fmt::Display for SpiritTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate points so their centroid lands on `center`
pub fn recenter(points: &[Point], center: Point) -> Vec<Point> {
    let Some(c) = centroid(points) else {
        return Vec::new();
    };
    let (dx, dy) = (center.x - c.x, center.y - c.y);
    points.iter().map(|p| p.translate(dx, dy)).collect()
}

/// Vertical spacing for a stack so the column fits inside the padded canvas
pub fn stack_spacing(count: usize, spacing: f64, spirit_radius: f64, options: &LayoutOptions) -> f64 {
    if count <= 1 {
        return spacing;
    }
    let room = options.height - 2.0 * options.padding - 2.0 * spirit_radius;
    spacing.min((room / (count - 1) as f64).max(0.0))
}

/// Ingredient to lay out in the center slot of a spirit-less recipe
///
/// First acid, sweet or dilution; otherwise the first ingredient. Indices in
/// `ring_members` are never promoted. None when every ingredient is in a ring.
pub fn virtual_spirit(ingredients: &[ClassifiedIngredient], ring_members: &[usize]) -> Option<usize> {
    let eligible = |i: &usize| !ring_members.contains(i);
    (0..ingredients.len())
        .filter(eligible)
        .find(|&i| {
            matches!(
                ingredients[i].kind,
                IngredientType::Acid | IngredientType::Sweet | IngredientType::Dilution
            )
        })
        .or_else(|| (0..ingredients.len()).find(eligible))
}

impl LayoutContext<'_> {
    /// Place the given ingredients in the spirit slots using the context's template
    pub(crate) fn place_spirits(&mut self, indices: &[usize]) {
        let spirit_radius = self.factory.radius_for(IngredientType::Spirit);
        let spacing = match self.template {
            SpiritTemplate::Stack => {
                stack_spacing(indices.len(), self.config.hex_spacing, spirit_radius, self.options)
            }
            _ => self.config.hex_spacing,
        };
        let relative = self.template.relative_positions(indices.len(), spacing);
        let positions = recenter(&relative, self.options.center());

        info!(
            template = %self.template,
            spirit_count = indices.len(),
            spacing,
            "Placing spirits"
        );

        for (&index, &position) in indices.iter().zip(positions.iter()) {
            let ingredient = &self.ingredients[index];
            if ingredient.kind != IngredientType::Spirit {
                warn!(
                    name = %ingredient.name,
                    kind = %ingredient.kind,
                    "No spirit in recipe, promoting ingredient to the center slot"
                );
            }
            let node = self
                .factory
                .ingredient_node(index, ingredient, position, None, 0.0);
            self.guard.register(position);
            let node_index = self.push_node(node);
            self.spirits.push(SpiritSlot {
                node: Some(node_index),
                position,
            });
            self.placed[index] = true;
            debug!(index, x = position.x, y = position.y, "Placed spirit");
        }
    }

    /// Reserve the canvas center as an invisible anchor when no ingredient can stand in
    pub(crate) fn place_bare_center(&mut self) {
        let position = self.options.center();
        warn!("Every ingredient belongs to a ring, anchoring rings on the canvas center");
        self.spirits.push(SpiritSlot {
            node: None,
            position,
        });
    }
}
