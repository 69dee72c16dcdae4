//! Molecule layout engine
//!
//! Turns an ordered list of classified ingredients into positioned nodes.
//! The phase order is fixed: spirits, rings, acids, sweets, bitters,
//! garnishes, then everything else. Later phases see the corners earlier
//! phases claimed, so reordering them changes the picture.

mod chain;
pub mod collision;
mod context;
pub mod corners;
pub mod factory;
pub mod family;
pub mod rings;
pub mod spirits;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, trace, Level};

use crate::core::{seed_from_ingredients, ClassifiedIngredient, IngredientType, LayoutOptions, MoleculeError, MoleculeNode};
use context::LayoutContext;

pub use collision::{clamp_to_bounds, CollisionGuard};
pub use corners::{anchor_spirit, Phase};
pub use factory::{backbone_shape, format_amount, Backbone, DefaultDecorator, NodeDecorator, NodeFactory};
pub use family::{corner_shift, resolve_family, shift_corners, DiagramRotation, SpiritFamily};
pub use rings::{detect_ring_groups, RingGroup};
pub use spirits::{virtual_spirit, SpiritTemplate};

/// Tuning constants for the layout engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Radius of the hexagon drawn around a spirit
    pub hex_radius: f64,
    /// Distance between neighboring spirits
    pub hex_spacing: f64,
    /// Bond from a hexagon corner to a junction or first node
    pub bond_length: f64,
    /// Bond between consecutive chain links
    pub chain_bond_length: f64,
    /// Edge length of ring polygons
    pub ring_bond_length: f64,
    /// Minimum distance between visible nodes
    pub min_node_distance: f64,
    /// Links per chain before a fresh corner is preferred
    pub max_chain_length: usize,
    /// Branch offset for acids and sweets, in degrees
    pub inline_branch_angle_deg: f64,
    /// Branch offset for terminal types, in degrees
    pub terminal_branch_angle_deg: f64,
    /// Spirit radius as a multiple of the base radius
    pub spirit_radius_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hex_radius: 30.0,
            hex_spacing: 90.0,
            bond_length: 40.0,
            chain_bond_length: 36.0,
            ring_bond_length: 34.0,
            min_node_distance: 28.0,
            max_chain_length: 4,
            inline_branch_angle_deg: 30.0,
            // half the tetrahedral angle
            terminal_branch_angle_deg: 54.75,
            spirit_radius_scale: 1.6,
        }
    }
}

/// Full result of one layout call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoleculeLayout {
    /// Nodes in creation order; parents always precede their children
    pub nodes: Vec<MoleculeNode>,
    pub family: SpiritFamily,
    pub rotation_degrees: f64,
    /// Spirit template used; None when the recipe has no spirit
    pub template: Option<SpiritTemplate>,
    /// Recipe fingerprint, stable across calls
    pub seed: u32,
    pub backbone: Backbone,
    pub junction_count: usize,
    pub ring_count: usize,
    pub skipped_ring_vertices: usize,
}

impl MoleculeLayout {
    /// Visible (non-junction) nodes
    pub fn visible_nodes(&self) -> impl Iterator<Item = &MoleculeNode> {
        self.nodes.iter().filter(|n| !n.is_junction())
    }

    pub fn node(&self, id: &str) -> Option<&MoleculeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Molecule layout algorithm
pub struct MoleculeLayoutAlgorithm {
    config: LayoutConfig,
}

impl MoleculeLayoutAlgorithm {
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a recipe with the default labels and palette
    pub fn layout(&self, ingredients: &[ClassifiedIngredient], options: &LayoutOptions) -> MoleculeLayout {
        self.layout_with(ingredients, options, &DefaultDecorator)
    }

    /// Lay out a recipe, taking labels and colors from `decorator`
    pub fn layout_with(
        &self,
        ingredients: &[ClassifiedIngredient],
        options: &LayoutOptions,
        decorator: &dyn NodeDecorator,
    ) -> MoleculeLayout {
        let layout_span = span!(
            Level::INFO,
            "layout_molecule",
            ingredient_count = ingredients.len(),
            width = options.width,
            height = options.height
        );
        let _enter = layout_span.enter();

        let seed = seed_from_ingredients(ingredients);
        let spirit_indices: Vec<usize> = ingredients
            .iter()
            .enumerate()
            .filter(|(_, i)| i.kind == IngredientType::Spirit)
            .map(|(index, _)| index)
            .collect();
        let spirit_refs: Vec<&ClassifiedIngredient> =
            spirit_indices.iter().map(|&i| &ingredients[i]).collect();

        if ingredients.is_empty() {
            trace!("Empty recipe");
            return MoleculeLayout {
                nodes: Vec::new(),
                family: SpiritFamily::Other,
                rotation_degrees: 0.0,
                template: None,
                seed,
                backbone: backbone_shape(&[], options, &self.config),
                junction_count: 0,
                ring_count: 0,
                skipped_ring_vertices: 0,
            };
        }

        let rotation = DiagramRotation::for_spirits(&spirit_refs);
        let template = SpiritTemplate::select(&spirit_refs);
        let ring_groups = detect_ring_groups(ingredients);
        debug!(
            spirit_count = spirit_indices.len(),
            ring_groups = ring_groups.len(),
            template = ?template,
            "Analyzed recipe"
        );

        let factory = NodeFactory::new(options, &self.config, decorator);
        let mut ctx = LayoutContext::new(
            &self.config,
            options,
            ingredients,
            factory,
            rotation,
            template.unwrap_or(SpiritTemplate::Single),
        );

        if spirit_indices.is_empty() {
            let ring_members: Vec<usize> = ring_groups
                .iter()
                .flat_map(|g| g.members.iter().copied())
                .collect();
            match virtual_spirit(ingredients, &ring_members) {
                Some(index) => ctx.place_spirits(&[index]),
                None => ctx.place_bare_center(),
            }
        } else {
            ctx.place_spirits(&spirit_indices);
        }

        for group in &ring_groups {
            if group.members.iter().any(|&m| ctx.placed[m]) {
                continue;
            }
            ctx.place_ring(group);
        }

        for phase in Phase::ORDER {
            ctx.run_phase(phase);
        }

        clamp_to_bounds(&mut ctx.nodes, options);

        let junction_count = ctx.factory.junction_count();
        let backbone = backbone_shape(&ctx.nodes, options, &self.config);
        info!(
            node_count = ctx.nodes.len(),
            junction_count,
            ring_count = ctx.ring_count,
            skipped_ring_vertices = ctx.skipped_ring_vertices,
            "Layout complete"
        );

        MoleculeLayout {
            nodes: ctx.nodes,
            family: rotation.family,
            rotation_degrees: rotation.degrees,
            template,
            seed,
            backbone,
            junction_count,
            ring_count: ctx.ring_count,
            skipped_ring_vertices: ctx.skipped_ring_vertices,
        }
    }
}

impl Default for MoleculeLayoutAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

/// Lay out a recipe with default tuning
///
/// Never fails: odd inputs degrade to best-effort placement. Empty input
/// yields an empty list.
pub fn compute_layout(ingredients: &[ClassifiedIngredient], options: &LayoutOptions) -> Vec<MoleculeNode> {
    MoleculeLayoutAlgorithm::new().layout(ingredients, options).nodes
}

/// Like [`compute_layout`], but rejects unusable options first
pub fn try_compute_layout(
    ingredients: &[ClassifiedIngredient],
    options: &LayoutOptions,
) -> Result<Vec<MoleculeNode>, MoleculeError> {
    options.validate()?;
    Ok(compute_layout(ingredients, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;

    fn ing(name: &str, kind: IngredientType, amount: f64) -> ClassifiedIngredient {
        ClassifiedIngredient::new(name, kind).with_amount(amount, Some("oz"))
    }

    fn whiskey_sour() -> Vec<ClassifiedIngredient> {
        vec![
            ing("whiskey", IngredientType::Spirit, 2.0),
            ing("lemon juice", IngredientType::Acid, 0.75),
            ing("simple syrup", IngredientType::Sweet, 0.5),
            ClassifiedIngredient::new("angostura", IngredientType::Bitter).with_amount(2.0, Some("dashes")),
        ]
    }

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-6
    }

    #[test]
    fn test_whiskey_sour_geometry() {
        let layout = MoleculeLayoutAlgorithm::new().layout(&whiskey_sour(), &LayoutOptions::default());
        assert_eq!(layout.nodes.len(), 5);
        assert_eq!(layout.junction_count, 1);

        let whiskey = layout.node("spirit-0").unwrap();
        assert!(close(whiskey.position(), Point::new(200.0, 150.0)));

        let junction = layout.node("junction-0").unwrap();
        assert!(close(junction.position(), Point::new(270.0, 150.0)));
        assert_eq!(junction.parent_id.as_deref(), Some("spirit-0"));

        let lemon = layout.node("acid-1").unwrap();
        let syrup = layout.node("sweet-2").unwrap();
        assert_eq!(lemon.parent_id.as_deref(), Some("junction-0"));
        assert_eq!(syrup.parent_id.as_deref(), Some("junction-0"));
        let dx = 40.0 * 30f64.to_radians().cos();
        assert!(close(lemon.position(), Point::new(270.0 + dx, 170.0)));
        assert!(close(syrup.position(), Point::new(270.0 + dx, 130.0)));

        let bitters = layout.node("bitter-3").unwrap();
        assert!(close(bitters.position(), Point::new(130.0, 150.0)));
        assert_eq!(bitters.parent_id.as_deref(), Some("spirit-0"));
    }

    #[test]
    fn test_parents_precede_children() {
        let layout = MoleculeLayoutAlgorithm::new().layout(&whiskey_sour(), &LayoutOptions::default());
        for (i, node) in layout.nodes.iter().enumerate() {
            if let Some(parent) = &node.parent_id {
                let parent_index = layout.nodes.iter().position(|n| &n.id == parent).unwrap();
                assert!(parent_index < i, "{} appears before its parent {}", node.id, parent);
            }
        }
    }

    #[test]
    fn test_long_acid_chain_spills_to_new_corner() {
        let mut recipe = vec![ing("gin", IngredientType::Spirit, 2.0)];
        recipe.extend((0..6).map(|i| ing(&format!("acid {}", i), IngredientType::Acid, 0.25 * (i + 1) as f64)));
        let layout = MoleculeLayoutAlgorithm::new().layout(&recipe, &LayoutOptions::default());
        assert_eq!(layout.nodes.len(), 7);
        let from_spirit = layout
            .nodes
            .iter()
            .filter(|n| n.kind == IngredientType::Acid && n.parent_id.as_deref() == Some("spirit-0"))
            .count();
        assert_eq!(from_spirit, 2);
    }

    #[test]
    fn test_chain_links_point_back() {
        let mut recipe = vec![ing("rum", IngredientType::Spirit, 2.0)];
        recipe.extend((0..3).map(|i| ing(&format!("syrup {}", i), IngredientType::Sweet, 0.25 * (i + 1) as f64)));
        let layout = MoleculeLayoutAlgorithm::new().layout(&recipe, &LayoutOptions::default());
        let sweets: Vec<_> = layout.nodes.iter().filter(|n| n.kind == IngredientType::Sweet).collect();
        assert_eq!(sweets.len(), 3);
        assert_eq!(sweets[1].parent_id.as_deref(), Some(sweets[0].id.as_str()));
        assert_eq!(sweets[2].parent_id.as_deref(), Some(sweets[1].id.as_str()));
        let bond = sweets[0].position().distance(sweets[1].position());
        assert!((bond - LayoutConfig::default().chain_bond_length).abs() < 1e-6);
    }

    #[test]
    fn test_no_spirit_promotes_acid() {
        let recipe = vec![
            ClassifiedIngredient::new("mint", IngredientType::Garnish),
            ing("lime juice", IngredientType::Acid, 1.0),
            ing("soda", IngredientType::Dilution, 3.0),
        ];
        let layout = MoleculeLayoutAlgorithm::new().layout(&recipe, &LayoutOptions::default());
        assert_eq!(layout.template, None);
        let lime = layout.node("acid-1").unwrap();
        assert!(close(lime.position(), Point::new(200.0, 150.0)));
        assert_eq!(lime.kind, IngredientType::Acid);
        assert_eq!(layout.nodes.len(), 3);
    }

    #[test]
    fn test_ring_only_recipe_keeps_every_member() {
        let recipe: Vec<_> = (0..4)
            .map(|i| ClassifiedIngredient::new(format!("leaf {}", i), IngredientType::Garnish).with_amount(1.0, None))
            .collect();
        let layout = MoleculeLayoutAlgorithm::new().layout(&recipe, &LayoutOptions::default());
        assert_eq!(layout.nodes.len(), 4);
        assert!(layout.nodes.iter().all(|n| n.ring_size == Some(4)));
        assert!(layout.nodes.iter().all(|n| n.parent_id.is_none()));
    }

    #[test]
    fn test_try_compute_layout_validates() {
        let bad = LayoutOptions::new(30.0, 30.0);
        assert!(try_compute_layout(&whiskey_sour(), &bad).is_err());
        assert_eq!(try_compute_layout(&whiskey_sour(), &LayoutOptions::default()).unwrap().len(), 5);
    }

    #[test]
    fn test_degenerate_canvas_does_not_panic() {
        let nodes = compute_layout(&whiskey_sour(), &LayoutOptions::new(10.0, 10.0));
        assert_eq!(nodes.len(), 5);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"hexRadius": 40}"#).unwrap();
        assert_eq!(config.hex_radius, 40.0);
        assert_eq!(config.max_chain_length, 4);
    }
}
